//! Output formatting for test outcomes.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::format_outcome;
