//! YouTube URL shape validation shared by the relay endpoint and the form controller.

use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted forms:
/// `[http[s]://][www.]youtube.com/(watch?v=|embed/|v/)<id>[&<params>]` and
/// `[http[s]://][www.]youtu.be/<id>[&<params>]`.
static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube\.com/(watch\?v=|embed/|v/)|youtu\.be/)[A-Za-z0-9_-]+(&[A-Za-z0-9_=]*)?$",
    )
    .expect("Invalid regex pattern")
});

/// Check whether `url` (after trimming) is a YouTube video URL we can relay.
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url.trim())
}

/// Trim the input and return it if it is a valid YouTube URL
pub fn normalize_youtube_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    YOUTUBE_URL.is_match(trimmed).then_some(trimmed)
}
