// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive client.
//
// Module responsibilities:
// - `api`: the `Order` record and a blocking HTTP client with one helper
//   per verb.
// - `render`: prints a response's status and pretty-printed body.
// - `input`: the "read one trimmed line" capability and its sources.
// - `ui`: the menu loop and per-action handlers.
// - `error`: error enums shared by the modules above.
pub mod api;
pub mod error;
pub mod input;
pub mod render;
pub mod ui;
