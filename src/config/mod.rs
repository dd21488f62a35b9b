//! Configuration management for the Vista gateway
//!
//! Runtime configuration merges three sources, later ones winning:
//! built-in defaults, the optional TOML file, and environment variables.
//! Secrets come from the environment only.

pub mod file;

use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// Vista gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server port, when set by the config file
    pub port: Option<u16>,

    /// Media storage locations and limits
    pub storage: StorageConfig,

    /// Scene analysis strategy
    pub analyzer: AnalyzerStrategy,

    /// Model override for the cloud-vision strategy
    pub vision_model: Option<String>,

    /// Speech synthesis configuration
    pub speech: SpeechConfig,

    /// How synthesized audio reaches the client
    pub delivery: AudioDelivery,

    /// API keys for external services
    pub api_keys: ApiKeys,
}

/// Media storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory for uploaded images
    pub upload_dir: PathBuf,

    /// Directory for synthesized audio
    pub audio_dir: PathBuf,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            audio_dir: PathBuf::from("audio"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Scene analysis strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerStrategy {
    /// Canned description keyed on width/height ratio
    AspectRatio,

    /// Stride-sampled brightness and color-bucket heuristic
    #[default]
    PixelSampling,

    /// Anthropic vision API call (requires `ANTHROPIC_API_KEY`)
    CloudVision,
}

impl FromStr for AnalyzerStrategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "aspect-ratio" | "aspect" => Ok(Self::AspectRatio),
            "pixel-sampling" | "pixels" => Ok(Self::PixelSampling),
            "cloud-vision" | "vision" => Ok(Self::CloudVision),
            other => Err(Error::Config(format!("unknown analyzer strategy: {other}"))),
        }
    }
}

/// Speech synthesis provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechProvider {
    /// OpenAI audio API (requires `OPENAI_API_KEY`)
    OpenAi,

    /// ElevenLabs API (requires `ELEVENLABS_API_KEY`)
    ElevenLabs,

    /// Fixed near-silent frame, no external calls
    #[default]
    Placeholder,
}

impl FromStr for SpeechProvider {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "elevenlabs" => Ok(Self::ElevenLabs),
            "placeholder" | "stub" => Ok(Self::Placeholder),
            other => Err(Error::Config(format!("unknown speech provider: {other}"))),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Provider backend
    pub provider: SpeechProvider,

    /// TTS model identifier; `None` uses the provider's default
    pub model: Option<String>,

    /// Voice identifier (OpenAI voice name or ElevenLabs voice ID)
    pub voice: String,

    /// Speed multiplier (OpenAI only)
    pub speed: f64,
}

impl SpeechConfig {
    /// Default OpenAI voice
    pub const DEFAULT_VOICE: &'static str = "alloy";
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            model: None,
            voice: Self::DEFAULT_VOICE.to_string(),
            speed: 1.0,
        }
    }
}

/// Audio delivery mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioDelivery {
    /// Base64 `data:` URL embedded in the JSON response
    #[default]
    Inline,

    /// URL pointing at the `/audio/{filename}` endpoint
    Referenced,
}

impl AudioDelivery {
    /// Stable label for logs and the status endpoint
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Referenced => "referenced",
        }
    }
}

impl FromStr for AudioDelivery {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Self::Inline),
            "referenced" | "reference" => Ok(Self::Referenced),
            other => Err(Error::Config(format!("unknown audio delivery mode: {other}"))),
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Anthropic API key (cloud vision)
    pub anthropic: Option<String>,

    /// OpenAI API key (TTS)
    pub openai: Option<String>,

    /// ElevenLabs API key (optional TTS)
    pub elevenlabs: Option<String>,
}

impl ApiKeys {
    /// Load keys from the environment; never from config files or constants
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            anthropic: env_key("ANTHROPIC_API_KEY"),
            openai: env_key("OPENAI_API_KEY"),
            elevenlabs: env_key("ELEVENLABS_API_KEY"),
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration: defaults, then the optional TOML file, then
    /// environment overrides
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed, or an
    /// override value is invalid
    pub fn load() -> Result<Self> {
        let overlay = file::load_default()?;
        Self::from_overlay(overlay)
    }

    fn from_overlay(overlay: file::ConfigFile) -> Result<Self> {
        let mut config = Self {
            port: overlay.server.port,
            storage: StorageConfig::default(),
            analyzer: AnalyzerStrategy::default(),
            vision_model: overlay.analyzer.vision_model,
            speech: SpeechConfig {
                provider: SpeechProvider::default(),
                model: overlay.speech.model,
                voice: overlay
                    .speech
                    .voice
                    .unwrap_or_else(|| SpeechConfig::DEFAULT_VOICE.to_string()),
                speed: overlay.speech.speed.unwrap_or(1.0),
            },
            delivery: AudioDelivery::default(),
            api_keys: ApiKeys::from_env(),
        };

        if let Some(dir) = overlay.storage.upload_dir {
            config.storage.upload_dir = dir;
        }
        if let Some(dir) = overlay.storage.audio_dir {
            config.storage.audio_dir = dir;
        }
        if let Some(bytes) = overlay.storage.max_upload_bytes {
            config.storage.max_upload_bytes = bytes;
        }
        if let Some(strategy) = overlay.analyzer.strategy {
            config.analyzer = strategy.parse()?;
        }
        if let Some(provider) = overlay.speech.provider {
            config.speech.provider = provider.parse()?;
        }
        if let Some(delivery) = overlay.speech.delivery {
            config.delivery = delivery.parse()?;
        }

        // Environment overrides win over the file
        if let Ok(value) = std::env::var("VISTA_UPLOAD_DIR") {
            config.storage.upload_dir = value.into();
        }
        if let Ok(value) = std::env::var("VISTA_AUDIO_DIR") {
            config.storage.audio_dir = value.into();
        }
        if let Ok(value) = std::env::var("VISTA_TTS_PROVIDER") {
            config.speech.provider = value.parse()?;
        }
        if let Ok(value) = std::env::var("VISTA_AUDIO_DELIVERY") {
            config.delivery = value.parse()?;
        }

        Ok(config)
    }
}
