//! Row hand-off between stages over a bounded tokio channel.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::collaborators::{RowSink, RowSource};
use crate::errors::SinkError;
use solr_sink_shared::Row;

/// Messages that flow between stages.
#[derive(Debug)]
pub enum RowMessage {
    /// A row.
    Row(Row),
    /// The producing stage failed; no more rows will follow.
    Error(String),
    /// The producing stage has finished.
    End,
}

/// Create a connected sink/source pair with the given buffer size.
pub fn row_channel(buffer: usize) -> (ChannelRowSink, ChannelRowSource) {
    let (sender, receiver) = mpsc::channel(buffer);
    (ChannelRowSink::new(sender), ChannelRowSource::new(receiver))
}

/// Reads rows from a channel.
///
/// `RowMessage::End` and a closed channel both mean end of input;
/// `RowMessage::Error` surfaces as a source error.
pub struct ChannelRowSource {
    receiver: mpsc::Receiver<RowMessage>,
    finished: bool,
}

impl ChannelRowSource {
    pub fn new(receiver: mpsc::Receiver<RowMessage>) -> Self {
        Self {
            receiver,
            finished: false,
        }
    }
}

#[async_trait]
impl RowSource for ChannelRowSource {
    async fn next_row(&mut self) -> Result<Option<Row>, SinkError> {
        if self.finished {
            return Ok(None);
        }

        match self.receiver.recv().await {
            Some(RowMessage::Row(row)) => Ok(Some(row)),
            Some(RowMessage::Error(e)) => {
                self.finished = true;
                Err(SinkError::source(e))
            }
            Some(RowMessage::End) | None => {
                debug!("Input channel ended");
                self.finished = true;
                Ok(None)
            }
        }
    }
}

/// Writes rows into a channel.
pub struct ChannelRowSink {
    sender: mpsc::Sender<RowMessage>,
    done: bool,
}

impl ChannelRowSink {
    pub fn new(sender: mpsc::Sender<RowMessage>) -> Self {
        Self {
            sender,
            done: false,
        }
    }
}

#[async_trait]
impl RowSink for ChannelRowSink {
    async fn put_row(&mut self, row: Row) -> Result<(), SinkError> {
        if self.done {
            return Err(SinkError::channel("output already marked done"));
        }

        self.sender
            .send(RowMessage::Row(row))
            .await
            .map_err(|e| SinkError::channel(e.to_string()))
    }

    async fn set_output_done(&mut self) -> Result<(), SinkError> {
        if self.done {
            return Ok(());
        }
        self.done = true;

        self.sender
            .send(RowMessage::End)
            .await
            .map_err(|e| SinkError::channel(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solr_sink_shared::{RowSchema, Value};
    use std::sync::Arc;

    fn row(title: &str) -> Row {
        let schema = Arc::new(RowSchema::new(["title"]).unwrap());
        Row::new(schema, vec![Value::from(title)]).unwrap()
    }

    #[tokio::test]
    async fn test_rows_then_end() {
        let (mut sink, mut source) = row_channel(4);

        sink.put_row(row("A")).await.unwrap();
        sink.put_row(row("B")).await.unwrap();
        sink.set_output_done().await.unwrap();

        assert_eq!(
            source.next_row().await.unwrap().unwrap().get(0),
            Some(&Value::from("A"))
        );
        assert!(source.next_row().await.unwrap().is_some());
        assert!(source.next_row().await.unwrap().is_none());
        assert!(source.next_row().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_channel_is_end_of_input() {
        let (sink, mut source) = row_channel(1);
        drop(sink);

        assert!(source.next_row().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_message_is_source_error() {
        let (sender, receiver) = mpsc::channel(2);
        let mut source = ChannelRowSource::new(receiver);
        sender
            .send(RowMessage::Error("line 3: bad record".to_string()))
            .await
            .unwrap();

        let err = source.next_row().await.unwrap_err();

        assert!(matches!(err, SinkError::SourceError(ref msg) if msg.contains("line 3")));
        assert!(source.next_row().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_after_done_fails() {
        let (mut sink, _source) = row_channel(4);
        sink.set_output_done().await.unwrap();
        sink.set_output_done().await.unwrap();

        assert!(matches!(
            sink.put_row(row("A")).await,
            Err(SinkError::ChannelError(_))
        ));
    }

    #[tokio::test]
    async fn test_put_to_dropped_receiver_fails() {
        let (mut sink, source) = row_channel(1);
        drop(source);

        assert!(sink.put_row(row("A")).await.is_err());
    }
}
