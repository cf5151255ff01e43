//! Report output formatters.

mod json;
mod pretty;

pub use json::JsonFormatter;
pub use pretty::PrettyFormatter;
