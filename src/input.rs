// Line input for the menu loop. The UI only ever needs "show a prompt and
// read one trimmed line", so that is the whole trait.

use dialoguer::Input;
use std::collections::VecDeque;
use std::io::{self, BufRead, ErrorKind, Write};

/// Source of trimmed input lines.
pub trait LineSource {
    /// Show `prompt` and read the next line with surrounding whitespace
    /// removed. Returns `Ok(None)` once the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads lines from any buffered reader, writing prompts to `prompt_out`.
/// Used when stdin is piped rather than a terminal.
pub struct ReaderLines<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> ReaderLines<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        ReaderLines { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !prompt.is_empty() {
            write!(self.prompt_out, "{}: ", prompt)?;
        }
        self.prompt_out.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }
}

/// Interactive terminal input through `dialoguer`.
#[derive(Default)]
pub struct TermLines;

impl TermLines {
    pub fn new() -> Self {
        TermLines
    }
}

impl LineSource for TermLines {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        // `allow_empty` so a bare Enter is a valid answer (the pause prompt).
        let res = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match res {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Replays a fixed list of lines and records every prompt it was shown.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedLines {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().map(|l| l.trim().to_string()))
    }
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).read_line(prompt)
    }
}
