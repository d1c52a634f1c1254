//! Wire-level status payload for analyze operations.
//!
//! These types mirror the JSON the analysis service returns from its
//! `analyzeResults` endpoint. Materialized domain records live in
//! [`super::receipt`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a remote analyze operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl OperationStatus {
    /// Whether the operation will not transition any further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "notStarted",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// A single server-reported error entry from a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Decoded body of a status check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeStatusPayload {
    pub status: OperationStatus,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated_date_time: Option<DateTime<Utc>>,
    /// Present once the operation has succeeded.
    #[serde(default)]
    pub analyze_result: Option<AnalyzePayload>,
    /// Present when the operation has failed.
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

/// Raw analysis payload attached to a succeeded status check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub read_results: Vec<ReadResultPayload>,
    #[serde(default)]
    pub document_results: Vec<DocumentResultPayload>,
}

/// Per-page text extraction metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResultPayload {
    pub page: u32,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub unit: String,
}

/// One recognized document within the analyzed input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResultPayload {
    #[serde(default)]
    pub doc_type: String,
    /// First and last page of the document, inclusive.
    #[serde(default)]
    pub page_range: Vec<u32>,
    #[serde(default)]
    pub fields: HashMap<String, FieldPayload>,
}

/// A single extracted field as the service reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
}
