//! Client-side form controller.
//!
//! Mirrors the three view states of the form (loading, error, result) and applies the
//! same URL validation as the relay before any request leaves the client. The relay
//! remains the authority; the local check only saves a round trip.

use std::time::Duration;
use tokio::time::Instant;

pub mod clipboard;
pub mod storage;
pub mod transport;

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use storage::{FileResultStore, MemoryResultStore, ResultStore, StoreError};
pub use transport::{ClientError, HttpRelayClient, RelayTransport};

use crate::relay::TranscriptResult;
use crate::utils::word_count;
use crate::youtube::is_valid_youtube_url;

/// How long the "copied" indicator stays on
pub const COPIED_INDICATOR: Duration = Duration::from_secs(3);

pub const EMPTY_URL_MESSAGE: &str = "Please enter a YouTube URL.";
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid YouTube URL.";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard.";

pub struct FormController {
    transport: Box<dyn RelayTransport>,
    clipboard: Box<dyn Clipboard>,
    store: Option<Box<dyn ResultStore>>,
    url: String,
    in_flight: bool,
    error: Option<String>,
    result: Option<TranscriptResult>,
    copied_until: Option<Instant>,
}

impl FormController {
    pub fn new(transport: Box<dyn RelayTransport>, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            transport,
            clipboard,
            store: None,
            url: String::new(),
            in_flight: false,
            error: None,
            result: None,
            copied_until: None,
        }
    }

    /// Attach a store and restore the last result from it
    pub fn with_store(mut self, store: Box<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self.mount();
        self
    }

    /// Reload the persisted result. A corrupt value is dropped and treated as absent.
    pub fn mount(&mut self) {
        let Some(store) = &self.store else {
            return;
        };

        match store.load() {
            Ok(Some(result)) => {
                tracing::debug!("Loaded saved transcript");
                self.result = Some(result);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Discarding saved transcript: {}", e);
                if let Err(e) = store.clear() {
                    tracing::warn!("Failed to remove saved transcript: {}", e);
                }
            }
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Front ends disable their submit control while this is false
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&TranscriptResult> {
        self.result.as_ref()
    }

    pub fn is_copied(&self) -> bool {
        self.copied_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// Words in the current result text, 0 without a result
    pub fn word_count(&self) -> usize {
        self.result
            .as_ref()
            .map_or(0, |result| word_count(&result.text))
    }

    /// Validate the current URL and, if it passes, request its transcript
    pub async fn submit(&mut self) {
        self.error = None;
        self.result = None;
        self.copied_until = None;

        let url = self.url.trim().to_string();
        if url.is_empty() {
            self.error = Some(EMPTY_URL_MESSAGE.to_string());
            return;
        }

        if !is_valid_youtube_url(&url) {
            self.error = Some(INVALID_URL_MESSAGE.to_string());
            return;
        }

        self.in_flight = true;
        let outcome = self.transport.extract(&url).await;
        self.in_flight = false;

        match outcome {
            Ok(result) => {
                self.persist(&result);
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Transcript request failed: {}", e);
                self.error = Some(e.display_message().to_string());
            }
        }
    }

    /// Copy the result text to the clipboard
    pub fn copy(&mut self) -> Result<(), ClipboardError> {
        let Some(result) = &self.result else {
            return Ok(());
        };

        match self.clipboard.write_text(&result.text) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + COPIED_INDICATOR);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Copy failed: {}", e);
                self.copied_until = None;
                self.error = Some(COPY_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Reset the form and forget the persisted result
    pub fn clear(&mut self) {
        self.url.clear();
        self.result = None;
        self.error = None;
        self.copied_until = None;

        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                tracing::warn!("Failed to remove saved transcript: {}", e);
            }
        }
    }

    fn persist(&self, result: &TranscriptResult) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(result) {
                tracing::warn!("Failed to save transcript: {}", e);
            }
        }
    }
}
