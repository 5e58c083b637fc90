use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use solr_sink_pipeline::{RowSink, SinkError};
use solr_sink_shared::Row;

/// Writes each forwarded row as one JSON object per line.
pub struct JsonLinesRowSink<W: AsyncWrite + Unpin + Send> {
    writer: W,
    rows: u64,
    done: bool,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesRowSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            rows: 0,
            done: false,
        }
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RowSink for JsonLinesRowSink<W> {
    async fn put_row(&mut self, row: Row) -> Result<(), SinkError> {
        if self.done {
            return Err(SinkError::downstream("output already marked done"));
        }

        let mut line =
            serde_json::to_vec(&row).map_err(|e| SinkError::downstream(e.to_string()))?;
        line.push(b'\n');
        self.writer
            .write_all(&line)
            .await
            .map_err(|e| SinkError::downstream(e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    async fn set_output_done(&mut self) -> Result<(), SinkError> {
        if self.done {
            return Ok(());
        }
        self.done = true;
        debug!(rows = self.rows, "Output done");

        self.writer
            .flush()
            .await
            .map_err(|e| SinkError::downstream(e.to_string()))
    }
}
