//! Shared stop flag.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use tracing::info;

use crate::collaborators::PipelineControl;

/// Stop flag shared by every stage of one pipeline run.
///
/// Clones observe the same flag, and a stage waiting in
/// [`PipelineControl::stopped`] wakes as soon as any clone requests a stop.
#[derive(Debug, Clone)]
pub struct StopFlag {
    stopped: Arc<watch::Sender<bool>>,
    requests: Arc<AtomicUsize>,
}

impl Default for StopFlag {
    fn default() -> Self {
        let (stopped, _) = watch::channel(false);
        Self {
            stopped: Arc::new(stopped),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a stop was requested.
    pub fn stop_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PipelineControl for StopFlag {
    fn request_stop(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.stopped.send_replace(true) {
            info!("Pipeline stop requested");
        }
    }

    fn is_stop_requested(&self) -> bool {
        *self.stopped.borrow()
    }

    async fn stopped(&self) {
        let mut receiver = self.stopped.subscribe();
        // the sender lives as long as self, so this only returns once set
        let _ = receiver.wait_for(|stopped| *stopped).await;
    }
}
