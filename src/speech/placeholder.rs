//! Placeholder synthesizer
//!
//! Writes a fixed near-silent MP3 frame instead of calling a TTS service.
//! Used for development and for deployments without TTS credentials; always
//! succeeds.

use async_trait::async_trait;

use super::SpeechSynthesizer;
use crate::Result;

/// One near-silent MPEG audio frame
const SILENT_MP3_FRAME: [u8; 16] = [
    0xFF, 0xFB, 0x90, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Synthesizer that emits the fixed placeholder frame
#[derive(Debug, Default)]
pub struct PlaceholderSynthesizer;

impl PlaceholderSynthesizer {
    /// Create the synthesizer
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechSynthesizer for PlaceholderSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Ok(SILENT_MP3_FRAME.to_vec())
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_returns_fixed_frame() {
        let synth = PlaceholderSynthesizer::new();
        let audio = synth.synthesize("anything").await.unwrap();
        assert_eq!(audio, SILENT_MP3_FRAME);
        // valid MPEG frame sync header
        assert_eq!(audio[..2], [0xFF, 0xFB]);
    }
}
