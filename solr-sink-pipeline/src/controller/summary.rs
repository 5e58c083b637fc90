//! Controller state and end-of-run summary.

use std::fmt;

use crate::errors::SinkError;

/// Lifecycle of one sink instance.
///
/// `Uninitialized -> Ready -> Running -> {Done, Failed}`. An endpoint that
/// cannot be used moves `Uninitialized` straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Created, no index client yet.
    Uninitialized,
    /// Index client built, no row seen yet.
    Ready,
    /// Field positions resolved, processing rows.
    Running,
    /// Input ended or the pipeline was stopped by another stage.
    Done,
    /// A fatal error stopped this stage.
    Failed,
}

impl SinkState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SinkState::Done | SinkState::Failed)
    }
}

impl fmt::Display for SinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinkState::Uninitialized => "uninitialized",
            SinkState::Ready => "ready",
            SinkState::Running => "running",
            SinkState::Done => "done",
            SinkState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What happened to a single row.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// Indexed and passed downstream.
    Forwarded,
    /// Not forwarded; the sink stops.
    Failed(SinkError),
}

impl RowOutcome {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, RowOutcome::Forwarded)
    }
}

impl From<Result<(), SinkError>> for RowOutcome {
    fn from(result: Result<(), SinkError>) -> Self {
        match result {
            Ok(()) => RowOutcome::Forwarded,
            Err(e) => RowOutcome::Failed(e),
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSummary {
    /// Rows taken from the upstream source.
    pub rows_read: u64,
    /// Rows forwarded downstream.
    pub rows_written: u64,
    /// Documents acknowledged by the index.
    pub documents_submitted: u64,
    /// Commits issued.
    pub commits: u64,
    /// Documents submitted since the last commit.
    pub pending: usize,
    /// Fatal errors raised (zero or one).
    pub errors: u64,
    /// State when the summary was taken.
    pub state: SinkState,
}
