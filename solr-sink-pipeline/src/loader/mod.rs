//! Loader module for the Solr sink pipeline.
//!
//! Tracks submitted documents and commits them in fixed-size batches.

use tracing::{debug, info, instrument};

use crate::errors::SinkError;
use solr_sink_repository::IndexClient;

/// Commits every `batch_size` submitted documents.
///
/// The counter belongs to one sink instance; replicas never share it.
#[derive(Debug)]
pub struct BatchCommitter {
    batch_size: usize,
    pending: usize,
    commits: u64,
}

impl BatchCommitter {
    /// Create a committer with the given threshold. `batch_size` must be positive.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            pending: 0,
            commits: 0,
        }
    }

    /// Documents submitted since the last commit.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Commits issued so far.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Count one submitted document and commit when the threshold is reached.
    ///
    /// The counter is reset before the commit call, so a threshold is never
    /// observed twice.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If this submission triggered a commit
    /// * `Ok(false)` - If the batch is still filling
    /// * `Err(SinkError::Commit)` - If the commit failed
    pub async fn record_submission(&mut self, client: &dyn IndexClient) -> Result<bool, SinkError> {
        self.pending += 1;
        if self.pending < self.batch_size {
            return Ok(false);
        }

        debug!(batch_size = self.batch_size, "Batch size reached, committing");
        self.pending = 0;
        self.commit(client).await?;
        Ok(true)
    }

    /// Commit a partial batch, if there is one.
    #[instrument(skip(self, client), fields(pending = self.pending))]
    pub async fn flush(&mut self, client: &dyn IndexClient) -> Result<bool, SinkError> {
        if self.pending == 0 {
            return Ok(false);
        }

        info!(pending = self.pending, "Committing partial batch");
        self.pending = 0;
        self.commit(client).await?;
        Ok(true)
    }

    async fn commit(&mut self, client: &dyn IndexClient) -> Result<(), SinkError> {
        client.commit().await.map_err(SinkError::Commit)?;
        self.commits += 1;
        Ok(())
    }
}
