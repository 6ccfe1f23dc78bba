//! Google Gemini `generateContent` client.
//!
//! The video is passed as a `file_data` part pointing at the YouTube URL, so nothing is
//! downloaded locally; Gemini fetches and transcribes the video itself.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{ProviderError, TranscriptProvider, TRANSCRIBE_PROMPT};
use crate::config::ProviderConfig;
use crate::utils::preview;

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    File { file_data: FileData<'a> },
}

#[derive(Debug, Serialize)]
struct FileData<'a> {
    file_uri: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub(crate) fn transcribe(video_url: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: TRANSCRIBE_PROMPT },
                    Part::File {
                        file_data: FileData { file_uri: video_url },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pull `candidates[0].content.parts[0].text` out of a raw response body
pub(crate) fn extract_transcript(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedResponse("no candidates".to_string()))?;

    let content = candidate
        .content
        .ok_or_else(|| ProviderError::MalformedResponse("candidate has no content".to_string()))?;

    let text = content
        .parts
        .into_iter()
        .next()
        .and_then(|part| part.text)
        .ok_or_else(|| ProviderError::MalformedResponse("content has no text part".to_string()))?;

    if text.trim().is_empty() {
        return Err(ProviderError::MalformedResponse("transcript is empty".to_string()));
    }

    Ok(text)
}

/// Gemini transcription provider
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(&config.endpoint, &config.model)
    }

    /// Full `generateContent` URL, without the key
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TranscriptProvider for GeminiProvider {
    async fn transcribe(&self, api_key: &str, video_url: &str) -> Result<String, ProviderError> {
        let url = self.generate_url();
        let request = GenerateContentRequest::transcribe(video_url);

        tracing::debug!(
            "Gemini API Call:\n  URL: {}?key=<redacted>\n  Method: POST\n  Body: {}",
            url,
            serde_json::to_string(&request).unwrap_or_default()
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_connect() {
                    format!("failed to connect to Gemini API: {e}")
                } else if e.is_timeout() {
                    format!("request to Gemini API timed out: {e}")
                } else {
                    format!("Gemini network error: {e}")
                };
                ProviderError::Transport(reason)
            })?;

        let status = response.status();
        tracing::info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Gemini responded"
        );

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "Gemini API error");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Gemini response body: {}", body);

        let transcript = extract_transcript(&body).map_err(|e| {
            tracing::error!(error = %e, "No transcript found in Gemini response");
            e
        })?;

        tracing::info!(
            length = transcript.len(),
            preview = %preview(&transcript, 100),
            "Extracted transcript"
        );

        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest::transcribe("https://youtu.be/abc");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": TRANSCRIBE_PROMPT },
                        { "file_data": { "file_uri": "https://youtu.be/abc" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_extract_first_candidate_first_part() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "hello world" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second candidate" }] } }
            ]
        })
        .to_string();

        assert_eq!(extract_transcript(&body).unwrap(), "hello world");
    }

    #[test]
    fn test_extract_rejects_missing_structure() {
        let cases = [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "content": {} }] }),
            json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "  \n\t " }] } }] }),
        ];

        for body in cases {
            let result = extract_transcript(&body.to_string());
            assert!(
                matches!(result, Err(ProviderError::MalformedResponse(_))),
                "expected malformed response for {body}"
            );
        }
    }

    #[test]
    fn test_extract_rejects_non_json() {
        assert!(matches!(
            extract_transcript("<html>oops</html>"),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_generate_url() {
        let provider = GeminiProvider::new("https://example.com/v1beta/", "gemini-2.0-flash-exp");
        assert_eq!(
            provider.generate_url(),
            "https://example.com/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
        assert_eq!(provider.name(), "Gemini");
    }
}
