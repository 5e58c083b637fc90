//! Solr sink binary.
//!
//! Reads CSV rows from `SINK_INPUT` (or stdin), indexes each into Solr and
//! writes the forwarded rows as JSON lines to `SINK_OUTPUT` (or stdout).

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use solr_sink::{AppConfig, Dependencies, IndexingError};
use solr_sink_pipeline::PipelineControl;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

async fn run() -> Result<(), IndexingError> {
    let config = AppConfig::from_env()?;
    let dependencies = Dependencies::new(config).await?;

    let control = dependencies.control.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            control.request_stop();
        }
    });

    let summary = dependencies.run().await?;
    info!(
        rows_written = summary.rows_written,
        commits = summary.commits,
        pending = summary.pending,
        "Sink finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run());
    // a reader blocked on stdin must not hold the process open
    runtime.shutdown_timeout(Duration::from_secs(1));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Solr sink failed");
            ExitCode::FAILURE
        }
    }
}
