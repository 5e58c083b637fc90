//! Index client trait definition.
//!
//! This module defines the abstract interface for submitting documents to
//! the remote index service and committing them.

use async_trait::async_trait;

use crate::errors::IndexError;
use solr_sink_shared::Document;

/// Abstract interface for the remote index service.
///
/// Implementations own their connection to the service. No retries are
/// performed at this layer: every failure is returned to the caller as is.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Submit one document.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to add
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the remote service acknowledged the document
    /// * `Err(IndexError::Submission)` - If the response was absent, malformed,
    ///   or reported a non-success status
    async fn submit(&self, document: &Document) -> Result<(), IndexError>;

    /// Make previously submitted documents durable and searchable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the commit succeeded
    /// * `Err(IndexError::Commit)` - If the remote service failed to commit
    async fn commit(&self) -> Result<(), IndexError>;

    /// Check if the index service is reachable and healthy.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the service is healthy
    /// * `Ok(false)` - If the service answered but reported itself unhealthy
    /// * `Err(IndexError)` - If the check could not be executed
    async fn ping(&self) -> Result<bool, IndexError>;

    /// Endpoint this client talks to, for logging and error context.
    fn endpoint(&self) -> &str;

    /// Release the connection. Later calls fail with a connection error.
    fn close(&self) {}
}
