//! TOML configuration file loading
//!
//! Supports `~/.config/vista/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of
//! defaults. Secrets never live here.

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Media storage configuration
    #[serde(default)]
    pub storage: StorageFileConfig,

    /// Scene analysis configuration
    #[serde(default)]
    pub analyzer: AnalyzerFileConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Media storage configuration
#[derive(Debug, Default, Deserialize)]
pub struct StorageFileConfig {
    /// Directory for uploaded images
    pub upload_dir: Option<PathBuf>,

    /// Directory for synthesized audio
    pub audio_dir: Option<PathBuf>,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: Option<usize>,
}

/// Scene analysis configuration
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzerFileConfig {
    /// Strategy name: "aspect-ratio", "pixel-sampling", or "cloud-vision"
    pub strategy: Option<String>,

    /// Model override for the cloud-vision strategy
    pub vision_model: Option<String>,
}

/// Speech synthesis configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// Provider name: "openai", "elevenlabs", or "placeholder"
    pub provider: Option<String>,

    /// TTS model identifier (e.g. "tts-1", "eleven_monolingual_v1")
    pub model: Option<String>,

    /// Voice identifier
    pub voice: Option<String>,

    /// Speed multiplier
    pub speed: Option<f64>,

    /// Delivery mode: "inline" or "referenced"
    pub delivery: Option<String>,
}

/// Default config file path: `~/.config/vista/config.toml`
#[must_use]
pub fn default_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".config/vista/config.toml"),
        |d| d.config_dir().join("vista").join("config.toml"),
    )
}

/// Load the default config file, or an empty overlay when it does not exist
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed
pub fn load_default() -> Result<ConfigFile> {
    load(&default_path())
}

/// Load a config file from a specific path
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed
pub fn load(path: &std::path::Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(path)?;
    let parsed = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let content = r#"
[server]
port = 8080

[storage]
upload_dir = "/tmp/up"
max_upload_bytes = 1048576

[analyzer]
strategy = "cloud-vision"
vision_model = "claude-sonnet-4-20250514"

[speech]
provider = "openai"
voice = "nova"
speed = 1.25
delivery = "referenced"
"#;
        let parsed: ConfigFile = toml::from_str(content).unwrap();
        assert_eq!(parsed.server.port, Some(8080));
        assert_eq!(parsed.storage.upload_dir, Some(PathBuf::from("/tmp/up")));
        assert_eq!(parsed.storage.max_upload_bytes, Some(1_048_576));
        assert_eq!(parsed.analyzer.strategy.as_deref(), Some("cloud-vision"));
        assert_eq!(parsed.speech.provider.as_deref(), Some("openai"));
        assert_eq!(parsed.speech.voice.as_deref(), Some("nova"));
        assert_eq!(parsed.speech.speed, Some(1.25));
        assert_eq!(parsed.speech.delivery.as_deref(), Some("referenced"));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let parsed: ConfigFile = toml::from_str("").unwrap();
        assert!(parsed.server.port.is_none());
        assert!(parsed.storage.upload_dir.is_none());
        assert!(parsed.analyzer.strategy.is_none());
        assert!(parsed.speech.provider.is_none());
    }

    #[test]
    fn missing_file_is_empty_overlay() {
        let parsed = load(std::path::Path::new("/definitely/not/here.toml")).unwrap();
        assert!(parsed.server.port.is_none());
    }
}
