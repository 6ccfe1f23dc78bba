use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::relay::{ExtractRequest, TranscriptResult};

/// Path of the relay endpoint, relative to the relay base URL
pub const EXTRACT_PATH: &str = "/api/extract-transcript";

/// Shown when the relay rejects a request without saying why
pub const FALLBACK_REJECTION: &str = "Failed to extract transcript";

/// Shown for network failures and unreadable responses
pub const FALLBACK_TRANSPORT: &str = "Failed to extract transcript. Please try again.";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The relay answered with an error status and message
    #[error("{0}")]
    Rejected(String),

    /// The relay could not be reached or its answer could not be read
    #[error("relay request failed: {0}")]
    Transport(String),
}

impl ClientError {
    /// Message shown to the user
    pub fn display_message(&self) -> &str {
        match self {
            ClientError::Rejected(message) => message,
            ClientError::Transport(_) => FALLBACK_TRANSPORT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    error: Option<String>,
}

/// Classify an error-status body. Only a JSON object counts as an answer from the relay.
fn rejection(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<RejectionBody>(body) {
        Ok(parsed) => ClientError::Rejected(
            parsed
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_REJECTION.to_string()),
        ),
        Err(e) => ClientError::Transport(format!("unreadable HTTP {status} response: {e}")),
    }
}

/// Sends one extraction request to the relay
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn extract(&self, url: &str) -> Result<TranscriptResult, ClientError>;
}

/// HTTP transport talking to a running relay server
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EXTRACT_PATH)
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn extract(&self, url: &str) -> Result<TranscriptResult, ClientError> {
        let endpoint = self.endpoint();
        let request = ExtractRequest {
            url: Some(url.to_string()),
        };

        tracing::info!("Starting transcript extraction for URL: {}", url);
        tracing::debug!("Sending API request to {}: {:?}", endpoint, request);

        let response = self
            .client
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Received response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("API request failed: {}", body);
            return Err(rejection(status.as_u16(), &body));
        }

        let result: TranscriptResult = serde_json::from_str(&body)
            .map_err(|e| ClientError::Transport(format!("unreadable relay response: {e}")))?;

        tracing::info!("Transcript extraction successful");
        Ok(result)
    }
}
