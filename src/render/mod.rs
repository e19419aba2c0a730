//! Output rendering for normalized pages.

mod json;

pub use json::{pages_to_json, to_json, JsonFormat};
