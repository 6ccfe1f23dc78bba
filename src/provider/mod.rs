use async_trait::async_trait;

pub mod gemini;

/// Instruction sent alongside the video reference
pub const TRANSCRIBE_PROMPT: &str = "Transcribe the video. Return only the spoken dialogue, verbatim. \
Omit any additional text or descriptions. \
Remember I don't need any new lines generated in the outputed text.";

/// Failures talking to the transcription provider
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response has no transcript: {0}")]
    MalformedResponse(String),
}

/// A service that turns a video URL into its spoken dialogue
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Transcribe the video at `video_url` using `api_key`
    async fn transcribe(&self, api_key: &str, video_url: &str) -> Result<String, ProviderError>;

    /// Name of the provider, for logs
    fn name(&self) -> &'static str;
}
