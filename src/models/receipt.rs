//! Materialized analysis results.
//!
//! Converts the raw analyze payload into the records callers work with.
//! The conversion is pure: once the service reports a succeeded status the
//! payload is trusted as-is.

use std::collections::HashMap;

use super::status::AnalyzePayload;

/// The materialized outcome of a completed analyze operation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeResult {
    /// Service schema version that produced the payload.
    pub version: String,
    pub receipts: Vec<RecognizedReceipt>,
    pub pages: Vec<PageInfo>,
}

/// One receipt recognized within the analyzed input.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedReceipt {
    pub doc_type: String,
    /// First and last page the receipt spans, when the service reports both.
    pub page_range: Option<(u32, u32)>,
    pub fields: HashMap<String, FieldValue>,
}

/// An extracted field value. Field names are service-defined; the value is
/// carried as reported rather than mapped to a per-field schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub text: String,
    pub value_type: String,
    pub confidence: f64,
}

/// Layout metadata for one analyzed page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub page_number: u32,
    pub angle: f64,
    pub width: f64,
    pub height: f64,
    pub unit: String,
}

impl AnalyzeResult {
    /// Materialize domain records from a raw analyze payload.
    pub fn from_payload(payload: AnalyzePayload) -> Self {
        let pages = payload
            .read_results
            .into_iter()
            .map(|read| PageInfo {
                page_number: read.page,
                angle: read.angle,
                width: read.width,
                height: read.height,
                unit: read.unit,
            })
            .collect();

        let receipts = payload
            .document_results
            .into_iter()
            .map(|doc| {
                let page_range = match doc.page_range.as_slice() {
                    [first, .., last] => Some((*first, *last)),
                    _ => None,
                };
                let fields = doc
                    .fields
                    .into_iter()
                    .map(|(name, field)| {
                        (
                            name,
                            FieldValue {
                                text: field.text,
                                value_type: field.value_type,
                                confidence: field.confidence,
                            },
                        )
                    })
                    .collect();
                RecognizedReceipt {
                    doc_type: doc.doc_type,
                    page_range,
                    fields,
                }
            })
            .collect();

        Self {
            version: payload.version,
            receipts,
            pages,
        }
    }
}
