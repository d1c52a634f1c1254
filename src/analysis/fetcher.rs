//! Status fetching boundary for analyze operations.
//!
//! The poller only depends on the [`StatusFetcher`] trait; the HTTP
//! implementation here is what production callers hand it. Tests substitute
//! scripted fetchers.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::models::{AnalyzeStatusPayload, RawResponse};

/// Path of the receipt analyze-results endpoint, relative to the service root.
const ANALYZE_RESULTS_PATH: &str = "formrecognizer/v2.1/prebuilt/receipt/analyzeResults";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// A decoded status check paired with its raw response snapshot.
#[derive(Debug, Clone)]
pub struct StatusCheck {
    pub payload: AnalyzeStatusPayload,
    pub response: RawResponse,
}

/// Capability to check the status of a remote analyze operation.
///
/// Implementations must tolerate concurrent use by multiple pollers.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetch the current status of the operation with the given id.
    ///
    /// Transport and service faults are returned as errors and leave no
    /// trace on the poller; only a decoded check carries a raw response.
    async fn fetch(
        &self,
        operation_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<StatusCheck, AnalysisError>;
}

/// HTTP status fetcher backed by a shared reqwest client.
#[derive(Clone)]
pub struct HttpStatusFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpStatusFetcher {
    /// Create a fetcher from client configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        // Validate the endpoint up front so a typo fails at construction
        // rather than on the first poll.
        Url::parse(&config.endpoint)
            .map_err(|e| AnalysisError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn status_url(&self, operation_id: &str) -> String {
        format!("{}/{}/{}", self.endpoint, ANALYZE_RESULTS_PATH, operation_id)
    }
}

#[async_trait]
impl StatusFetcher for HttpStatusFetcher {
    async fn fetch(
        &self,
        operation_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<StatusCheck, AnalysisError> {
        let url = self.status_url(operation_id);
        debug!("Checking operation status: {}", url);

        let mut request = self.client.get(&url);
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        let send = request.send();
        let response = match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(AnalysisError::Cancelled),
                result = send => result?,
            },
            None => send.await?,
        };

        let status = response.status();
        let mut headers = std::collections::HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let payload: AnalyzeStatusPayload =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Parse(e.to_string()))?;

        Ok(StatusCheck {
            payload,
            response: RawResponse {
                status: status.as_u16(),
                headers,
                body,
            },
        })
    }
}
