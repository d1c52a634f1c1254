//! Poller for a single remote analyze operation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::analysis::fetcher::{StatusCheck, StatusFetcher};
use crate::analysis::poll::{self, PollableOperation};
use crate::error::{AnalysisError, OperationFailure};
use crate::models::{AnalyzeResult, OperationStatus, RawResponse};

/// Terminal outcome of the operation, or lack of one.
///
/// A single tagged state instead of separate value/error/completed fields:
/// readers can never observe a completed operation without exactly one
/// outcome, and publishing an outcome is one write under one lock.
enum OperationState {
    Pending,
    Succeeded(Arc<AnalyzeResult>),
    Failed(OperationFailure),
}

struct Inner {
    state: OperationState,
    last_response: Option<RawResponse>,
}

/// Tracks a server-side analyze job until it reaches a terminal status.
///
/// Refreshing is caller-driven; the poller schedules nothing on its own.
/// Safe for one refresher with any number of concurrent readers; overlapping
/// refresh calls are serialized internally.
pub struct AnalyzeOperation {
    id: String,
    fetcher: Arc<dyn StatusFetcher>,
    /// Serializes concurrent refresh_status callers.
    refresh_gate: tokio::sync::Mutex<()>,
    inner: RwLock<Inner>,
}

impl AnalyzeOperation {
    /// Track the operation with the given id.
    pub fn new(id: impl Into<String>, fetcher: Arc<dyn StatusFetcher>) -> Self {
        Self {
            id: id.into(),
            fetcher,
            refresh_gate: tokio::sync::Mutex::new(()),
            inner: RwLock::new(Inner {
                state: OperationState::Pending,
                last_response: None,
            }),
        }
    }

    /// Track the operation identified by an operation-location URL.
    ///
    /// The id is the final `/`-delimited path segment. References without a
    /// separator or with an empty final segment (trailing slash) are
    /// rejected rather than producing a silently unusable id.
    pub fn from_location(
        location: &str,
        fetcher: Arc<dyn StatusFetcher>,
    ) -> Result<Self, AnalysisError> {
        let id = operation_id_from_location(location)?;
        Ok(Self::new(id, fetcher))
    }

    /// Opaque identifier of the remote job.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether a terminal status has been observed.
    pub fn has_completed(&self) -> bool {
        !matches!(self.read_inner().state, OperationState::Pending)
    }

    /// Whether the operation succeeded and a result is available.
    pub fn has_value(&self) -> bool {
        matches!(self.read_inner().state, OperationState::Succeeded(_))
    }

    /// Snapshot of the most recent raw response, absent until the first
    /// check completes.
    pub fn last_response(&self) -> Option<RawResponse> {
        self.read_inner().last_response.clone()
    }

    /// The materialized result.
    ///
    /// Returns `NotReady` while the job is still running, the cached value
    /// after success, or the cached structured failure after failure. Never
    /// touches the network.
    pub fn result(&self) -> Result<Arc<AnalyzeResult>, AnalysisError> {
        match &self.read_inner().state {
            OperationState::Pending => Err(AnalysisError::NotReady(self.id.clone())),
            OperationState::Succeeded(value) => Ok(Arc::clone(value)),
            OperationState::Failed(failure) => {
                Err(AnalysisError::OperationFailed(failure.clone()))
            }
        }
    }

    /// Perform one status check and apply any transition it implies.
    ///
    /// Once the operation has completed this is an idempotent no-op that
    /// returns the cached response without network interaction. A check that
    /// observes a failed status caches the structured failure and returns it
    /// as the error; transport faults propagate without touching state.
    pub async fn refresh_status(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<RawResponse, AnalysisError> {
        let _gate = self.refresh_gate.lock().await;

        {
            let inner = self.read_inner();
            if !matches!(inner.state, OperationState::Pending) {
                if let Some(response) = inner.last_response.clone() {
                    return Ok(response);
                }
            }
        }

        debug!("Refreshing status of operation {}", self.id);
        let StatusCheck { payload, response } = self.fetcher.fetch(&self.id, cancel).await?;

        let mut inner = self.write_inner();
        inner.last_response = Some(response.clone());

        match payload.status {
            OperationStatus::Succeeded => {
                let result = Arc::new(AnalyzeResult::from_payload(
                    payload.analyze_result.unwrap_or_default(),
                ));
                info!(
                    "Operation {} succeeded with {} receipt(s)",
                    self.id,
                    result.receipts.len()
                );
                inner.state = OperationState::Succeeded(result);
                Ok(response)
            }
            OperationStatus::Failed => {
                let failure = OperationFailure::from_response(&response, &payload.errors);
                warn!("Operation {} failed: {}", self.id, failure);
                inner.state = OperationState::Failed(failure.clone());
                Err(AnalysisError::OperationFailed(failure))
            }
            OperationStatus::NotStarted | OperationStatus::Running => {
                debug!("Operation {} is {}", self.id, payload.status.as_str());
                Ok(response)
            }
        }
    }

    /// Poll until the operation reaches a terminal state, then return the
    /// final raw response and the materialized result.
    ///
    /// See [`wait_until_complete`](crate::analysis::wait_until_complete)
    /// for interval and cancellation semantics.
    pub async fn wait_until_complete(
        &self,
        poll_interval: Option<Duration>,
        cancel: Option<&CancellationToken>,
    ) -> Result<(RawResponse, Arc<AnalyzeResult>), AnalysisError> {
        poll::wait_until_complete(self, poll_interval, cancel).await
    }

    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("operation state lock poisoned")
    }

    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("operation state lock poisoned")
    }
}

#[async_trait]
impl PollableOperation for AnalyzeOperation {
    type Output = Arc<AnalyzeResult>;

    async fn refresh(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<RawResponse, AnalysisError> {
        self.refresh_status(cancel).await
    }

    fn has_completed(&self) -> bool {
        self.has_completed()
    }

    fn output(&self) -> Result<Arc<AnalyzeResult>, AnalysisError> {
        self.result()
    }

    fn suggested_delay(&self) -> Option<Duration> {
        self.read_inner()
            .last_response
            .as_ref()
            .and_then(RawResponse::retry_after)
    }
}

/// Derive an operation id from an operation-location reference.
fn operation_id_from_location(location: &str) -> Result<String, AnalysisError> {
    match location.rsplit_once('/') {
        Some((_, id)) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(AnalysisError::InvalidLocation(location.to_string())),
    }
}
