//! Downstream adapters receiving the rows the sink forwards.

mod json_lines;

pub use json_lines::JsonLinesRowSink;
