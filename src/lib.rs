//! Client-side polling for long-running document analysis operations.
//!
//! A remote analysis job is started elsewhere and identified by an opaque
//! operation id (or an operation-location URL carrying one). This crate
//! tracks such a job: check its status once with
//! [`AnalyzeOperation::refresh_status`], or poll it to completion with
//! [`AnalyzeOperation::wait_until_complete`], then read the materialized
//! receipts or the structured failure the server reported.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use formrec::{AnalysisConfig, AnalyzeOperation, HttpStatusFetcher};
//!
//! # async fn run() -> Result<(), formrec::AnalysisError> {
//! let config = AnalysisConfig::default()
//!     .with_endpoint("https://analysis.example.com")
//!     .with_api_key("secret");
//! let fetcher = Arc::new(HttpStatusFetcher::new(&config)?);
//!
//! let operation = AnalyzeOperation::new("abc-123", fetcher);
//! let (_response, result) = operation.wait_until_complete(None, None).await?;
//! for receipt in &result.receipts {
//!     println!("{}: {} field(s)", receipt.doc_type, receipt.fields.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;

pub use analysis::{
    wait_until_complete, AnalyzeOperation, HttpStatusFetcher, PollableOperation, StatusCheck,
    StatusFetcher, DEFAULT_POLL_INTERVAL,
};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, OperationFailure};
pub use models::{
    AnalyzeResult, AnalyzeStatusPayload, ErrorEntry, FieldValue, OperationStatus, PageInfo,
    RawResponse, RecognizedReceipt,
};
