// src/monitor/mod.rs
// Declares the sibling module files of the serial monitoring pipeline
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod recorder;
pub mod source;
pub mod window;
// Re-export the structs so callers don't have to spell out the full paths
pub use error::MonitorError;
pub use parse::{parse_line, parse_or_zero, ParseLineError};
pub use pipeline::{Monitor, SampleRecord};
pub use recorder::{format_record, SampleLog};
pub use source::{LineSource, ManualSource, SerialLineSource};
pub use window::SampleWindow;
