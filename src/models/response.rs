//! Raw response snapshot from a status check.

use std::collections::HashMap;
use std::time::Duration;

/// Transport-level snapshot of the most recent status check.
///
/// Kept around for diagnostics after the decoded payload has been consumed.
/// Header names are stored lowercase, matching what reqwest reports.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code of the check.
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Unparsed response body.
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Server-suggested delay before the next status check, if any.
    ///
    /// Only the delta-seconds form of `Retry-After` is honored; the HTTP-date
    /// form is rare on polling endpoints and is ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get("retry-after")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}
