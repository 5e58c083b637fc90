//! Controller module for the Solr sink pipeline.
//!
//! Drives rows from the upstream source through the resolver, mapper,
//! index client and batch committer, and forwards them downstream.

mod summary;

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::collaborators::{PipelineControl, RowSink, RowSource};
use crate::config::{SinkConfig, STATUS_OK_VALUE};
use crate::errors::SinkError;
use crate::loader::BatchCommitter;
use crate::processor::{DocumentMapper, FieldResolver, ResolvedIndices};
use solr_sink_repository::{IndexClient, SolrClient};
use solr_sink_shared::{Row, RowSchema, Value};

pub use summary::{RowOutcome, SinkState, SinkSummary};

/// Row sink that indexes every row into Solr.
///
/// The controller:
/// - Builds the index client on `init`
/// - Resolves field positions from the first row
/// - Submits one document per row and commits every `batch_size` documents
/// - Forwards each indexed row downstream
/// - Stops the whole pipeline on the first failure
///
/// Rows are processed strictly one at a time; the next row is not read
/// until the current one has been submitted, committed if due, and forwarded.
pub struct RowSinkController {
    config: SinkConfig,
    client: Option<Arc<dyn IndexClient>>,
    resolver: FieldResolver,
    mapper: DocumentMapper,
    committer: BatchCommitter,
    indices: Option<ResolvedIndices>,
    output_schema: Option<Arc<RowSchema>>,
    state: SinkState,
    rows_read: u64,
    rows_written: u64,
    documents_submitted: u64,
    errors: u64,
}

impl RowSinkController {
    /// Create an uninitialized controller after validating `config`.
    pub fn new(config: SinkConfig) -> Result<Self, SinkError> {
        config.validate()?;

        Ok(Self {
            resolver: FieldResolver::new(&config.mappings),
            mapper: DocumentMapper::new(&config.mappings),
            committer: BatchCommitter::new(config.batch_size),
            config,
            client: None,
            indices: None,
            output_schema: None,
            state: SinkState::Uninitialized,
            rows_read: 0,
            rows_written: 0,
            documents_submitted: 0,
            errors: 0,
        })
    }

    /// Build the Solr client for the configured endpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The sink is `Ready`
    /// * `Err(SinkError::InvalidEndpoint)` - The URL is unusable; the sink is `Failed`
    ///   and will never process rows
    pub fn init(&mut self) -> Result<(), SinkError> {
        self.expect_state(SinkState::Uninitialized, "init")?;

        match SolrClient::new(&self.config.endpoint, self.config.client.clone()) {
            Ok(client) => self.init_with_client(Arc::new(client)),
            Err(e) => {
                error!(endpoint = %self.config.endpoint, error = %e, "URL is invalid");
                self.errors += 1;
                self.state = SinkState::Failed;
                Err(SinkError::from_init(e))
            }
        }
    }

    /// Use an already built index client.
    pub fn init_with_client(&mut self, client: Arc<dyn IndexClient>) -> Result<(), SinkError> {
        self.expect_state(SinkState::Uninitialized, "init")?;

        info!(
            endpoint = %client.endpoint(),
            mappings = self.config.mappings.len(),
            batch_size = self.config.batch_size,
            commit_on_end = self.config.commit_on_end,
            "Sink initialized"
        );
        self.client = Some(client);
        self.state = SinkState::Ready;
        Ok(())
    }

    pub fn state(&self) -> SinkState {
        self.state
    }

    /// Documents submitted since the last commit.
    pub fn pending(&self) -> usize {
        self.committer.pending()
    }

    pub fn summary(&self) -> SinkSummary {
        SinkSummary {
            rows_read: self.rows_read,
            rows_written: self.rows_written,
            documents_submitted: self.documents_submitted,
            commits: self.committer.commits(),
            pending: self.committer.pending(),
            errors: self.errors,
            state: self.state,
        }
    }

    /// Process rows until the input ends, a stop is requested, or a row fails.
    ///
    /// On failure the error is logged, a pipeline stop is requested, end of
    /// output is signalled downstream, and the failing row is not forwarded.
    /// The index client is released whichever way the run ends.
    ///
    /// # Returns
    ///
    /// * `Ok(SinkSummary)` - The sink ended in `Done`
    /// * `Err(SinkError)` - The sink ended in `Failed`, or was not `Ready`
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint))]
    pub async fn run<S, D, C>(
        &mut self,
        source: &mut S,
        downstream: &mut D,
        control: &C,
    ) -> Result<SinkSummary, SinkError>
    where
        S: RowSource + ?Sized,
        D: RowSink + ?Sized,
        C: PipelineControl + ?Sized,
    {
        self.expect_state(SinkState::Ready, "run")?;
        info!("Starting to run");

        let outcome = self.process_rows(source, downstream, control).await;
        self.teardown();

        let summary = self.summary();
        info!(
            rows_read = summary.rows_read,
            rows_written = summary.rows_written,
            documents = summary.documents_submitted,
            commits = summary.commits,
            pending = summary.pending,
            errors = summary.errors,
            state = %summary.state,
            "Finished processing"
        );

        outcome.map(|()| summary)
    }

    async fn process_rows<S, D, C>(
        &mut self,
        source: &mut S,
        downstream: &mut D,
        control: &C,
    ) -> Result<(), SinkError>
    where
        S: RowSource + ?Sized,
        D: RowSink + ?Sized,
        C: PipelineControl + ?Sized,
    {
        loop {
            // a pending read is abandoned as soon as another stage stops the pipeline
            let next = tokio::select! {
                biased;
                () = control.stopped() => {
                    info!(rows_read = self.rows_read, "Stop requested, no more rows will be read");
                    self.finish(downstream, SinkState::Done).await;
                    return Ok(());
                }
                next = source.next_row() => next,
            };

            let row = match next {
                Ok(Some(row)) => row,
                Ok(None) => return self.end_of_input(downstream, control).await,
                Err(e) => return Err(self.fail(e, downstream, control).await),
            };
            self.rows_read += 1;

            match self.handle_row(row, downstream).await {
                RowOutcome::Forwarded => self.rows_written += 1,
                RowOutcome::Failed(e) => return Err(self.fail(e, downstream, control).await),
            }

            self.log_feedback();
        }
    }

    async fn handle_row<D: RowSink + ?Sized>(&mut self, row: Row, downstream: &mut D) -> RowOutcome {
        match self.process_row(row).await {
            Ok(row) => downstream.put_row(row).await.into(),
            Err(e) => RowOutcome::Failed(e),
        }
    }

    /// Index one row and return it ready to forward.
    #[instrument(skip_all, fields(row = self.rows_read))]
    async fn process_row(&mut self, row: Row) -> Result<Row, SinkError> {
        let client = self
            .client
            .clone()
            .ok_or_else(|| SinkError::invalid_state("index client is not initialized"))?;

        if self.indices.is_none() {
            self.start_running(row.schema())?;
        }
        let indices = self
            .indices
            .as_ref()
            .ok_or_else(|| SinkError::invalid_state("field positions are not resolved"))?;

        let document = self.mapper.map(&row, indices);
        debug!(endpoint = %client.endpoint(), "Adding document");

        client
            .submit(&document)
            .await
            .map_err(SinkError::Submission)?;
        self.documents_submitted += 1;

        self.committer.record_submission(client.as_ref()).await?;

        self.append_status(row)
    }

    /// First row: resolve field positions once for the whole run.
    fn start_running(&mut self, schema: &Arc<RowSchema>) -> Result<(), SinkError> {
        let indices = self.resolver.resolve(schema)?;

        if let Some(name) = &self.config.status_field {
            let extended = schema
                .with_field(name.as_str())
                .map_err(|e| SinkError::config(e.to_string()))?;
            self.output_schema = Some(Arc::new(extended));
        }

        self.indices = Some(indices);
        self.state = SinkState::Running;
        debug!(fields = ?schema.fields(), "Field mappings resolved");
        Ok(())
    }

    fn append_status(&self, row: Row) -> Result<Row, SinkError> {
        match &self.output_schema {
            Some(schema) => row
                .with_appended(Arc::clone(schema), Value::from(STATUS_OK_VALUE))
                .map_err(|e| SinkError::downstream(e.to_string())),
            None => Ok(row),
        }
    }

    async fn end_of_input<D, C>(&mut self, downstream: &mut D, control: &C) -> Result<(), SinkError>
    where
        D: RowSink + ?Sized,
        C: PipelineControl + ?Sized,
    {
        let pending = self.committer.pending();
        info!(rows_read = self.rows_read, pending = pending, "End of input");

        if self.config.commit_on_end {
            if let Some(client) = self.client.clone() {
                if let Err(e) = self.committer.flush(client.as_ref()).await {
                    return Err(self.fail(e, downstream, control).await);
                }
            }
        } else if pending > 0 {
            debug!(pending = pending, "Leaving partial batch to the index's commit policy");
        }

        self.finish(downstream, SinkState::Done).await;
        Ok(())
    }

    /// Record a fatal error and stop the pipeline.
    async fn fail<D, C>(&mut self, error: SinkError, downstream: &mut D, control: &C) -> SinkError
    where
        D: RowSink + ?Sized,
        C: PipelineControl + ?Sized,
    {
        error!(error = %error, rows_read = self.rows_read, "Error in step running");
        self.errors += 1;
        control.request_stop();
        self.finish(downstream, SinkState::Failed).await;
        error
    }

    async fn finish<D: RowSink + ?Sized>(&mut self, downstream: &mut D, state: SinkState) {
        if let Err(e) = downstream.set_output_done().await {
            warn!(error = %e, "Failed to signal end of output");
        }
        self.state = state;
    }

    fn teardown(&mut self) {
        if let Some(client) = self.client.take() {
            client.close();
            debug!("Released index client");
        }
    }

    fn log_feedback(&self) {
        let interval = self.config.feedback_interval;
        if interval > 0 && self.rows_read % interval == 0 {
            info!(rows_read = self.rows_read, "Line number");
        }
    }

    fn expect_state(&self, expected: SinkState, operation: &str) -> Result<(), SinkError> {
        if self.state == expected {
            return Ok(());
        }
        Err(SinkError::invalid_state(format!(
            "cannot {} a sink in state {}",
            operation, self.state
        )))
    }
}

impl Drop for RowSinkController {
    fn drop(&mut self) {
        self.teardown();
    }
}
