//! Configuration for the analysis client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for talking to the document analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Service endpoint (default: http://localhost:5000, the local container)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key sent with every status check. Empty disables the auth header
    /// (local containers accept unauthenticated requests).
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds for a single status check
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fallback delay between polls when the service suggests none
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_secs() -> u64 {
    1
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default inter-poll delay as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
