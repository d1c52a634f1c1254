//! Data models for analyze operations.

mod receipt;
mod response;
mod status;

pub use receipt::{AnalyzeResult, FieldValue, PageInfo, RecognizedReceipt};
pub use response::RawResponse;
pub use status::{
    AnalyzePayload, AnalyzeStatusPayload, DocumentResultPayload, ErrorEntry, FieldPayload,
    OperationStatus, ReadResultPayload,
};
