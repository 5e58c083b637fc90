//! Test doubles for the sink's collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use solr_sink_pipeline::{RowSink, RowSource, SinkError};
use solr_sink_repository::{IndexClient, IndexError};
use solr_sink_shared::{Document, Row, RowSchema, Value};

pub const ENDPOINT: &str = "http://idx.example/update";

/// Mock index client recording submitted documents and commits.
#[derive(Default)]
pub struct MockIndexClient {
    pub documents: Mutex<Vec<Document>>,
    pub submit_calls: AtomicUsize,
    pub commit_count: AtomicUsize,
    pub close_count: AtomicUsize,
    /// 1-based submit call that fails with a remote status.
    pub fail_submit_on: Option<usize>,
    /// 1-based commit call that fails.
    pub fail_commit_on: Option<usize>,
}

impl MockIndexClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_submit(call: usize) -> Self {
        Self {
            fail_submit_on: Some(call),
            ..Self::default()
        }
    }

    pub fn failing_commit(call: usize) -> Self {
        Self {
            fail_commit_on: Some(call),
            ..Self::default()
        }
    }

    pub fn commits(&self) -> usize {
        self.commit_count.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexClient for MockIndexClient {
    async fn submit(&self, document: &Document) -> Result<(), IndexError> {
        let call = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_submit_on == Some(call) {
            return Err(IndexError::submission(ENDPOINT, Some(500), "HTTP 500 Internal Server Error"));
        }
        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn commit(&self) -> Result<(), IndexError> {
        let call = self.commit_count.load(Ordering::SeqCst) + 1;
        if self.fail_commit_on == Some(call) {
            return Err(IndexError::commit(ENDPOINT, Some(503), "HTTP 503 Service Unavailable"));
        }
        self.commit_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<bool, IndexError> {
        Ok(true)
    }

    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Row source over a fixed list of rows.
pub struct VecRowSource {
    rows: VecDeque<Row>,
    pub reads: usize,
}

impl VecRowSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            reads: 0,
        }
    }
}

#[async_trait]
impl RowSource for VecRowSource {
    async fn next_row(&mut self) -> Result<Option<Row>, SinkError> {
        let row = self.rows.pop_front();
        if row.is_some() {
            self.reads += 1;
        }
        Ok(row)
    }
}

/// Row source whose input never arrives, like a quiet stdin.
pub struct PendingRowSource;

#[async_trait]
impl RowSource for PendingRowSource {
    async fn next_row(&mut self) -> Result<Option<Row>, SinkError> {
        std::future::pending().await
    }
}

/// Downstream sink keeping every forwarded row.
#[derive(Default)]
pub struct RecordingRowSink {
    pub rows: Vec<Row>,
    pub done_signals: usize,
}

#[async_trait]
impl RowSink for RecordingRowSink {
    async fn put_row(&mut self, row: Row) -> Result<(), SinkError> {
        self.rows.push(row);
        Ok(())
    }

    async fn set_output_done(&mut self) -> Result<(), SinkError> {
        self.done_signals += 1;
        Ok(())
    }
}

/// Rows with `title` and `body` columns.
pub fn title_body_rows(values: &[(&str, &str)]) -> Vec<Row> {
    let schema = Arc::new(RowSchema::new(["title", "body"]).unwrap());
    values
        .iter()
        .map(|(title, body)| {
            Row::new(schema.clone(), vec![Value::from(*title), Value::from(*body)]).unwrap()
        })
        .collect()
}

pub fn client(mock: MockIndexClient) -> Arc<MockIndexClient> {
    Arc::new(mock)
}
