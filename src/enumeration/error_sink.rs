//! Per-call error sink and its observer task.
//!
//! Source tasks report failures through a bounded channel. The observer logs
//! each one and hands the collected list back when the call finishes, so no
//! background task outlives `enumerate`.

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::error::SourceError;
use crate::observability::metrics;

/// Producer side, cloned into every source task.
#[derive(Debug, Clone)]
pub struct ErrorSink {
    tx: mpsc::Sender<SourceError>,
}

impl ErrorSink {
    /// Report a failure without ever blocking the caller.
    ///
    /// The channel is sized to the number of sources and each source reports
    /// at most once, so a full channel means a misuse; the error is logged
    /// and dropped rather than stalling enumeration.
    pub fn report(&self, error: SourceError) {
        match self.tx.try_send(error) {
            Ok(()) => {}
            Err(TrySendError::Full(error)) => {
                tracing::error!(error = %error, "Error sink full, dropping error");
            }
            Err(TrySendError::Closed(error)) => {
                tracing::error!(error = %error, "Error sink closed, dropping error");
            }
        }
    }
}

/// Consumer side: a task draining the channel until every sink is dropped.
#[derive(Debug)]
pub struct ErrorObserver {
    handle: JoinHandle<Vec<SourceError>>,
}

impl ErrorObserver {
    /// Wait for all sinks to drop and return everything observed.
    pub async fn finish(self) -> Vec<SourceError> {
        match self.handle.await {
            Ok(errors) => errors,
            Err(e) => {
                tracing::error!(error = %e, "Error observer task failed");
                Vec::new()
            }
        }
    }
}

/// Create a sink/observer pair. `capacity` is clamped to at least 1.
pub fn error_sink(capacity: usize) -> (ErrorSink, ErrorObserver) {
    let (tx, mut rx) = mpsc::channel::<SourceError>(capacity.max(1));

    let handle = tokio::spawn(async move {
        let mut observed = Vec::new();
        while let Some(error) = rx.recv().await {
            tracing::warn!(source = %error.source_name, error = %error.kind, "Source failed");
            metrics::record_source_failure(&error.source_name, error.kind_label());
            observed.push(error);
        }
        observed
    });

    (ErrorSink { tx }, ErrorObserver { handle })
}
