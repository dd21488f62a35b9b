//! Text-to-speech synthesis
//!
//! Converts a scene description into an MP3 artifact. A synthesis failure is
//! reported to the caller but must never fail the enclosing request; the
//! handler drops the audio URL instead.

mod elevenlabs;
mod openai;
mod placeholder;

pub use elevenlabs::ElevenLabsSynthesizer;
pub use openai::OpenAiSynthesizer;
pub use placeholder::PlaceholderSynthesizer;

use async_trait::async_trait;

use crate::Result;

/// Strategy producing MP3 audio from text
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the synthesis call fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Provider name for logging and the status endpoint
    fn name(&self) -> &'static str;
}
