use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::config::CredentialSource;
use crate::provider::TranscriptProvider;
use crate::youtube::normalize_youtube_url;
use crate::RelayError;

pub mod metadata;

pub use metadata::DisplayMetadata;

/// Transcript plus display metadata, as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Spoken dialogue, verbatim
    pub text: String,

    /// Display duration, e.g. "12:34"
    pub duration: String,

    /// Display language name
    pub language: String,

    /// Display confidence percentage, e.g. "96%"
    pub confidence: String,
}

impl TranscriptResult {
    pub fn new(text: String, metadata: DisplayMetadata) -> Self {
        Self {
            text,
            duration: metadata.duration.to_string(),
            language: metadata.language.to_string(),
            confidence: metadata.confidence.to_string(),
        }
    }
}

/// Body of `POST /api/extract-transcript`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl ExtractRequest {
    /// Parse a raw request body. An empty body is treated as a request without a URL.
    pub fn from_body(body: &[u8]) -> Result<Self, RelayError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| RelayError::MalformedBody(e.to_string()))
    }
}

/// Error body for 4xx/5xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One-shot pipeline: validate, fetch credential, call provider, attach metadata.
///
/// Holds no per-request state, so a single instance is shared by every request.
#[derive(Clone)]
pub struct TranscriptRelay {
    provider: Arc<dyn TranscriptProvider>,
    credentials: Arc<dyn CredentialSource>,
}

impl TranscriptRelay {
    pub fn new(provider: Arc<dyn TranscriptProvider>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self { provider, credentials }
    }

    /// Extract the transcript for `url`, short-circuiting at the first failure
    pub async fn extract(&self, url: Option<&str>) -> Result<TranscriptResult, RelayError> {
        let started = Instant::now();

        let url = match url {
            Some(url) if !url.is_empty() => url,
            _ => {
                tracing::warn!("No URL provided");
                return Err(RelayError::MissingUrl);
            }
        };

        tracing::info!("Validating YouTube URL: {}", url);
        let video_url = normalize_youtube_url(url).ok_or_else(|| {
            tracing::warn!("Invalid YouTube URL format");
            RelayError::InvalidUrl(url.to_string())
        })?;
        tracing::info!("YouTube URL validation passed");

        let api_key = self.credentials.api_key().ok_or_else(|| {
            let source = self.credentials.describe();
            tracing::error!("{} API key not configured ({})", self.provider.name(), source);
            RelayError::MissingCredential(source)
        })?;

        tracing::info!("API key found, calling {}", self.provider.name());
        let text = self.provider.transcribe(&api_key, video_url).await?;

        let result = TranscriptResult::new(text, DisplayMetadata::random(&mut rand::thread_rng()));

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            text_length = result.text.len(),
            duration = %result.duration,
            language = %result.language,
            confidence = %result.confidence,
            "Transcript extraction completed"
        );

        Ok(result)
    }
}
