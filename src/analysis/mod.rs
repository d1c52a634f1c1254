//! Analyze operation polling.
//!
//! An [`AnalyzeOperation`] tracks one server-side analysis job: refresh its
//! status, read the materialized result once it completes, or wait for it
//! with [`AnalyzeOperation::wait_until_complete`].

mod fetcher;
mod operation;
mod poll;

pub use fetcher::{HttpStatusFetcher, StatusCheck, StatusFetcher};
pub use operation::AnalyzeOperation;
pub use poll::{wait_until_complete, PollableOperation, DEFAULT_POLL_INTERVAL};
