// Response rendering: status line, then the body re-indented as JSON or,
// when it is not JSON, the raw bytes.

use reqwest::blocking::Response;
use serde::de::IgnoredAny;
use std::io::{self, Write};
use tracing::warn;

/// Print the status code and body of `res`. Only console write errors are
/// returned; a body that cannot be read is reported inline.
pub fn response<W: Write>(out: &mut W, res: Response) -> io::Result<()> {
    writeln!(out, "HTTP status: {}", res.status().as_u16())?;
    match res.bytes() {
        Ok(bytes) => body(out, &bytes),
        Err(err) => {
            warn!(error = %err, "failed to read response body");
            writeln!(out, "failed to read response body: {}", err)
        }
    }
}

/// Print a response body, pretty when it parses as JSON, verbatim otherwise.
pub fn body<W: Write>(out: &mut W, raw: &[u8]) -> io::Result<()> {
    writeln!(out, "Response body:")?;
    match pretty_json(raw) {
        Some(text) => writeln!(out, "{}", text),
        None => {
            out.write_all(raw)?;
            writeln!(out)
        }
    }
}

/// Re-indent `raw` with two spaces. Only whitespace between tokens changes;
/// strings, escapes, numbers and duplicate keys are copied as sent.
pub fn pretty_json(raw: &[u8]) -> Option<String> {
    serde_json::from_slice::<IgnoredAny>(raw).ok()?;
    let text = std::str::from_utf8(raw).ok()?;
    Some(indent(text))
}

// Assumes `text` is valid JSON.
fn indent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    // Set after `{` or `[`; the newline waits so empty containers stay `{}`.
    let mut opened = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            continue;
        }
        if opened {
            opened = false;
            if c == '}' || c == ']' {
                depth = depth.saturating_sub(1);
                out.push(c);
                continue;
            }
            newline(&mut out, depth);
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                depth += 1;
                opened = true;
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }
    out
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}
