//! Upstream adapters feeding rows into the sink.

mod csv;

pub use self::csv::{cell_value, forward_rows};
