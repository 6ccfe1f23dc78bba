//! YouTube Transcript Relay - extract spoken-dialogue transcripts from YouTube videos
//!
//! This library provides a thin HTTP relay that validates a YouTube URL, forwards it to
//! the Gemini `generateContent` API and returns the transcript together with display
//! metadata, plus a client-side form controller that drives the relay.

pub mod cli;
pub mod client;
pub mod config;
pub mod output;
pub mod provider;
pub mod relay;
pub mod server;
pub mod utils;
pub mod youtube;

pub use cli::{Cli, Commands, OutputFormat};
pub use client::FormController;
pub use config::{Config, CredentialSource, EnvCredential};
pub use provider::{gemini::GeminiProvider, ProviderError, TranscriptProvider};
pub use relay::{TranscriptRelay, TranscriptResult};
pub use server::RelayServer;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Errors produced by the relay endpoint, each mapped to one HTTP error shape
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("no URL supplied")]
    MissingUrl,

    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("not a YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("credential not configured: {0}")]
    MissingCredential(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Whether the caller can fix the request themselves
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingUrl | RelayError::MalformedBody(_) | RelayError::InvalidUrl(_)
        )
    }

    /// Message returned to the caller. Never contains provider output or configuration detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "YouTube URL is required",
            RelayError::MalformedBody(_) => "Invalid request body",
            RelayError::InvalidUrl(_) => "Invalid YouTube URL",
            RelayError::MissingCredential(_) => "API key not configured",
            RelayError::Provider(ProviderError::MalformedResponse(_)) => "No transcript found in video",
            RelayError::Provider(_) => "Failed to extract transcript from video",
            RelayError::Internal(_) => "Internal server error",
        }
    }
}
