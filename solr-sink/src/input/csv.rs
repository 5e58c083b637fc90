//! CSV reader that feeds rows into the sink's input channel.
//!
//! The header line becomes the row schema. Cells are text and are indexed
//! exactly as read.

use std::io::Read;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::IndexingError;
use solr_sink_pipeline::collaborators::RowMessage;
use solr_sink_shared::{Row, RowSchema, Value};

/// Read every record from `reader` and send it to `sender`.
///
/// Blocks the calling thread; run it on a blocking task. A read error is
/// forwarded as `RowMessage::Error` so the sink fails instead of treating the
/// truncated input as complete. Returns the number of rows sent.
///
/// A closed receiver means the sink has stopped; reading ends quietly.
pub fn forward_rows<R: Read>(
    reader: R,
    delimiter: u8,
    sender: mpsc::Sender<RowMessage>,
) -> Result<u64, IndexingError> {
    let mut csv = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let schema = match csv.headers() {
        Ok(headers) => RowSchema::new(headers.iter().map(str::trim)),
        Err(e) => return Err(report(&sender, e.into())),
    };
    let schema = match schema {
        Ok(schema) => Arc::new(schema),
        Err(e) => return Err(report(&sender, IndexingError::config(e.to_string()))),
    };
    debug!(fields = ?schema.fields(), "Read CSV header");

    let mut sent = 0u64;
    for record in csv.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => return Err(report(&sender, e.into())),
        };

        let values = record.iter().map(cell_value).collect();
        let row = match Row::new(Arc::clone(&schema), values) {
            Ok(row) => row,
            Err(e) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let err = IndexingError::config(format!("line {}: {}", line, e));
                return Err(report(&sender, err));
            }
        };

        if sender.blocking_send(RowMessage::Row(row)).is_err() {
            info!(rows = sent, "Sink stopped reading input");
            return Ok(sent);
        }
        sent += 1;
    }

    // receiver may already be gone after a failure
    let _ = sender.blocking_send(RowMessage::End);
    info!(rows = sent, "Finished reading input");
    Ok(sent)
}

fn report(sender: &mpsc::Sender<RowMessage>, err: IndexingError) -> IndexingError {
    error!(error = %err, "Failed to read input");
    let _ = sender.blocking_send(RowMessage::Error(err.to_string()));
    err
}

/// Value of one CSV cell: `Null` when empty, otherwise the cell text.
pub fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Null
    } else {
        Value::from(cell)
    }
}
