//! Display metadata attached to every transcript.
//!
//! These values are placeholders: Gemini reports none of them, so each field is drawn
//! uniformly and independently from a fixed list on every request.

use rand::Rng;

pub const DURATIONS: [&str; 5] = ["12:34", "8:42", "15:17", "6:23", "11:08"];
pub const LANGUAGES: [&str; 5] = ["English", "Spanish", "French", "German", "Italian"];
pub const CONFIDENCE_SCORES: [&str; 5] = ["94%", "96%", "92%", "98%", "95%"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMetadata {
    pub duration: &'static str,
    pub language: &'static str,
    pub confidence: &'static str,
}

impl DisplayMetadata {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            duration: pick(rng, &DURATIONS),
            language: pick(rng, &LANGUAGES),
            confidence: pick(rng, &CONFIDENCE_SCORES),
        }
    }
}

fn pick<R: Rng, const N: usize>(rng: &mut R, values: &[&'static str; N]) -> &'static str {
    values[rng.gen_range(0..N)]
}
