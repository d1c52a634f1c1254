//! Generic wait-until-complete loop for long-running operations.
//!
//! The loop is written against [`PollableOperation`] rather than a concrete
//! operation type so other operation kinds can reuse it unchanged; only the
//! result type differs per implementor.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::AnalysisError;
use crate::models::RawResponse;

/// Fallback delay between polls when neither the caller nor the server
/// suggests one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The minimal surface the wait loop needs from an operation.
#[async_trait]
pub trait PollableOperation: Send + Sync {
    /// The materialized result type of the operation.
    type Output;

    /// Perform one status check. Must be a no-op returning the cached
    /// response once the operation has completed.
    async fn refresh(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<RawResponse, AnalysisError>;

    /// Whether a terminal status has been observed.
    fn has_completed(&self) -> bool;

    /// The final value, `NotReady` while pending, or the cached terminal
    /// failure.
    fn output(&self) -> Result<Self::Output, AnalysisError>;

    /// Server-suggested delay before the next check, if the last response
    /// carried one.
    fn suggested_delay(&self) -> Option<Duration>;
}

/// Poll an operation until it reaches a terminal state.
///
/// Between checks the loop sleeps for `poll_interval` when given, else the
/// server-suggested delay, else [`DEFAULT_POLL_INTERVAL`]. A terminal failed
/// status surfaces exactly as a single-shot refresh would. Cancellation is
/// cooperative: it aborts the in-flight check and the inter-poll sleep, and
/// leaves the operation state untouched.
pub async fn wait_until_complete<P>(
    operation: &P,
    poll_interval: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Result<(RawResponse, P::Output), AnalysisError>
where
    P: PollableOperation + ?Sized,
{
    loop {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(AnalysisError::Cancelled);
            }
        }

        let response = operation.refresh(cancel).await?;
        if operation.has_completed() {
            let output = operation.output()?;
            return Ok((response, output));
        }

        let delay = poll_interval
            .or_else(|| operation.suggested_delay())
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        debug!("Operation still running, next check in {:?}", delay);

        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(AnalysisError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            },
            None => tokio::time::sleep(delay).await,
        }
    }
}
