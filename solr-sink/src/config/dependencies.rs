//! Dependency initialization and wiring for the Solr sink.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::sync::Arc;
use tokio::io::{AsyncWrite, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::input::forward_rows;
use crate::output::JsonLinesRowSink;
use crate::IndexingError;
use solr_sink_pipeline::collaborators::{ChannelRowSource, StopFlag};
use solr_sink_pipeline::{PipelineControl, RowSinkController, SinkError, SinkSummary};
use solr_sink_repository::{IndexClient, SolrClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The initialized sink, ready to run.
    pub controller: RowSinkController,
    /// Rows read by the CSV reader task.
    pub source: ChannelRowSource,
    /// Where forwarded rows are written.
    pub downstream: JsonLinesRowSink<Box<dyn AsyncWrite + Unpin + Send>>,
    /// Pipeline stop flag shared with the signal handler.
    pub control: StopFlag,
    /// Blocking task reading the CSV input.
    pub reader: JoinHandle<Result<u64, IndexingError>>,
}

impl Dependencies {
    /// Initialize all dependencies from `config`.
    ///
    /// Opens the input and output, builds the Solr client (checking the ping
    /// handler first when configured) and starts the CSV reader.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails
    pub async fn new(config: AppConfig) -> Result<Self, IndexingError> {
        info!(
            endpoint = %config.sink.endpoint,
            mappings = config.sink.mappings.len(),
            input = ?config.input,
            output = ?config.output,
            "Initializing dependencies"
        );

        let input: Box<dyn Read + Send> = match &config.input {
            Some(path) => Box::new(BufReader::new(File::open(path)?)),
            None => Box::new(io::stdin()),
        };
        let output: Box<dyn AsyncWrite + Unpin + Send> = match &config.output {
            Some(path) => Box::new(BufWriter::new(tokio::fs::File::create(path).await?)),
            None => Box::new(BufWriter::new(tokio::io::stdout())),
        };

        let mut controller = RowSinkController::new(config.sink.clone())?;
        if config.ping_on_start {
            let client = SolrClient::new(&config.sink.endpoint, config.sink.client.clone())
                .map_err(SinkError::from_init)?;

            // Verify Solr is reachable
            let healthy = client
                .ping()
                .await
                .map_err(|e| IndexingError::config(format!("Solr ping failed: {}", e)))?;
            if !healthy {
                return Err(IndexingError::config("Solr ping handler reported an unhealthy core"));
            }
            info!("Solr connection verified");

            controller.init_with_client(Arc::new(client))?;
        } else {
            controller.init()?;
        }

        let (sender, receiver) = mpsc::channel(config.channel_buffer_size);
        let delimiter = config.csv_delimiter;
        let reader = tokio::task::spawn_blocking(move || forward_rows(input, delimiter, sender));

        Ok(Self {
            controller,
            source: ChannelRowSource::new(receiver),
            downstream: JsonLinesRowSink::new(output),
            control: StopFlag::new(),
            reader,
        })
    }

    /// Run the sink to completion and wait for the reader to finish.
    pub async fn run(self) -> Result<SinkSummary, IndexingError> {
        let Self {
            mut controller,
            mut source,
            mut downstream,
            control,
            reader,
        } = self;

        let outcome = controller
            .run(&mut source, &mut downstream, &control)
            .await;

        // unblocks a reader still waiting on a full channel
        drop(source);
        if control.is_stop_requested() {
            // the reader may be blocked on input that never arrives
            return outcome.map_err(IndexingError::from);
        }
        let read = reader
            .await
            .map_err(|e| IndexingError::TaskError(e.to_string()))?;

        let summary = outcome?;
        match read {
            Ok(rows) => info!(rows = rows, "Input reader finished"),
            Err(e) => {
                warn!(error = %e, "Input reader failed");
                return Err(e);
            }
        }
        Ok(summary)
    }
}
