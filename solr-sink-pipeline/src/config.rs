//! Configuration for the row sink.

use solr_sink_repository::ClientConfig;
use solr_sink_shared::FieldMapping;

use crate::errors::SinkError;

/// Number of submitted documents between commits.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Rows between progress log lines.
pub const DEFAULT_FEEDBACK_INTERVAL: u64 = 50_000;

/// Value appended to forwarded rows when a status field is configured.
pub const STATUS_OK_VALUE: &str = "0";

/// Configuration for one sink instance.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Update handler URL of the index service.
    pub endpoint: String,
    /// Source row field to document field mappings, in document order.
    pub mappings: Vec<FieldMapping>,
    /// Number of submitted documents that triggers a commit.
    pub batch_size: usize,
    /// Commit a partial batch when the input ends.
    pub commit_on_end: bool,
    /// Name of the marker column appended to forwarded rows, if any.
    pub status_field: Option<String>,
    /// Rows between progress log lines; zero disables them.
    pub feedback_interval: u64,
    /// HTTP client settings.
    pub client: ClientConfig,
}

impl SinkConfig {
    /// Create a config with default batching and client settings.
    pub fn new(endpoint: impl Into<String>, mappings: Vec<FieldMapping>) -> Self {
        Self {
            endpoint: endpoint.into(),
            mappings,
            batch_size: DEFAULT_BATCH_SIZE,
            commit_on_end: false,
            status_field: None,
            feedback_interval: DEFAULT_FEEDBACK_INTERVAL,
            client: ClientConfig::default(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_commit_on_end(mut self, commit_on_end: bool) -> Self {
        self.commit_on_end = commit_on_end;
        self
    }

    pub fn with_status_field(mut self, status_field: impl Into<String>) -> Self {
        self.status_field = Some(status_field.into());
        self
    }

    pub fn with_feedback_interval(mut self, feedback_interval: u64) -> Self {
        self.feedback_interval = feedback_interval;
        self
    }

    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Check everything that can be checked before the first row arrives.
    ///
    /// The endpoint URL itself is parsed when the client is built.
    pub fn validate(&self) -> Result<(), SinkError> {
        if self.endpoint.trim().is_empty() {
            return Err(SinkError::config("endpoint URL is required"));
        }
        if self.mappings.is_empty() {
            return Err(SinkError::config("at least one field mapping is required"));
        }
        for mapping in &self.mappings {
            if mapping.source_field.is_empty() || mapping.target_field.is_empty() {
                return Err(SinkError::config(format!(
                    "field mapping [{}] -> [{}] has an empty name",
                    mapping.source_field, mapping.target_field
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(SinkError::config("batch size must be positive"));
        }
        if matches!(self.status_field.as_deref(), Some("")) {
            return Err(SinkError::config("status field name must not be empty"));
        }
        self.client
            .validate()
            .map_err(|e| SinkError::config(e.to_string()))
    }
}
