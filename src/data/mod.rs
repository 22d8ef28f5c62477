//! Recording data: record types and file parsing.

pub mod loader;
pub mod types;

pub use loader::{parse_recording, parse_recording_str, LoadError};
pub use types::{condition_legend, Condition, Record, Recording, Source};
