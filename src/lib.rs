//! Vista Gateway - scene narration for uploaded images
//!
//! Accepts an uploaded image over HTTP, produces a short natural-language
//! description of the scene, synthesizes that description to speech, and
//! returns both the text and an audio artifact to the client.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   POST /analyze                      │
//! └────────────────────┬─────────────────────────────────┘
//!                      │
//! ┌────────────────────▼─────────────────────────────────┐
//! │                 Vista Gateway                        │
//! │  MediaStore │ SceneAnalyzer      │ SpeechSynthesizer │
//! │  uploads/   │ aspect-ratio       │ openai            │
//! │  audio/     │ pixel-sampling     │ elevenlabs        │
//! │             │ cloud-vision       │ placeholder       │
//! └────────────────────┬─────────────────────────────────┘
//!                      │
//! ┌────────────────────▼─────────────────────────────────┐
//! │   JSON: description, scene_type, audio_url           │
//! │   (inline data URL, or served via GET /audio/{file}) │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod speech;
pub mod storage;

pub use analyzer::{SceneAnalysis, SceneAnalyzer};
pub use config::Config;
pub use error::{Error, Result};
pub use speech::SpeechSynthesizer;
pub use storage::MediaStore;
