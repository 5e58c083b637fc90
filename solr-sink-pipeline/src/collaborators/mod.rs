//! Interfaces to the surrounding pipeline engine.
//!
//! The sink sees the engine only through three capabilities: a source of
//! rows, a downstream consumer of forwarded rows, and pipeline-wide stop
//! control. Channel and flag based implementations are provided for
//! wiring stages together inside one process.

mod channel;
mod control;

use async_trait::async_trait;

use crate::errors::SinkError;
use solr_sink_shared::Row;

pub use channel::{row_channel, ChannelRowSink, ChannelRowSource, RowMessage};
pub use control::StopFlag;

/// Upstream rows.
#[async_trait]
pub trait RowSource: Send {
    /// Next row, or `None` once the input is exhausted.
    async fn next_row(&mut self) -> Result<Option<Row>, SinkError>;
}

/// Downstream consumer of forwarded rows.
#[async_trait]
pub trait RowSink: Send {
    /// Forward one row.
    async fn put_row(&mut self, row: Row) -> Result<(), SinkError>;

    /// Signal that no more rows will be forwarded.
    async fn set_output_done(&mut self) -> Result<(), SinkError>;
}

/// Pipeline-wide stop control shared by cooperating stages.
#[async_trait]
pub trait PipelineControl: Send + Sync {
    /// Ask every stage of the pipeline to stop.
    fn request_stop(&self);

    /// Whether a stop has been requested by any stage.
    fn is_stop_requested(&self) -> bool;

    /// Resolves once a stop has been requested.
    async fn stopped(&self);
}
