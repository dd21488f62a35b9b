//! HTTP API server for the Vista gateway

pub mod analyze;
pub mod audio;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analyzer::{
    AspectRatioAnalyzer, CloudVisionAnalyzer, PixelSampleAnalyzer, SceneAnalyzer, VisionClient,
};
use crate::config::{AnalyzerStrategy, AudioDelivery, SpeechProvider};
use crate::speech::{
    ElevenLabsSynthesizer, OpenAiSynthesizer, PlaceholderSynthesizer, SpeechSynthesizer,
};
use crate::storage::MediaStore;
use crate::{Config, Error, Result};

/// Shared state for API handlers
pub struct ApiState {
    /// Upload and audio storage
    pub store: MediaStore,
    /// Active scene analysis strategy
    pub analyzer: Arc<dyn SceneAnalyzer>,
    /// Active speech synthesis strategy
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// How synthesized audio reaches the client
    pub delivery: AudioDelivery,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl ApiState {
    /// Build API state from configuration, selecting the analyzer and
    /// synthesizer strategies
    ///
    /// # Errors
    ///
    /// Returns error if storage directories cannot be created or a selected
    /// strategy is missing its API key
    pub fn from_config(config: &Config) -> Result<Arc<Self>> {
        let store = MediaStore::new(&config.storage.upload_dir, &config.storage.audio_dir)?;

        let analyzer: Arc<dyn SceneAnalyzer> = match config.analyzer {
            AnalyzerStrategy::AspectRatio => Arc::new(AspectRatioAnalyzer::new()),
            AnalyzerStrategy::PixelSampling => Arc::new(PixelSampleAnalyzer::new()),
            AnalyzerStrategy::CloudVision => {
                let key = config.api_keys.anthropic.clone().ok_or_else(|| {
                    Error::Config(
                        "ANTHROPIC_API_KEY required for the cloud-vision analyzer".to_string(),
                    )
                })?;
                let mut client = VisionClient::new(key)?;
                if let Some(model) = &config.vision_model {
                    client = client.with_model(model.clone());
                }
                Arc::new(CloudVisionAnalyzer::new(client))
            }
        };

        let speech: Arc<dyn SpeechSynthesizer> = match config.speech.provider {
            SpeechProvider::OpenAi => {
                let key = config.api_keys.openai.clone().ok_or_else(|| {
                    Error::Config("OPENAI_API_KEY required for OpenAI TTS".to_string())
                })?;
                let model = config
                    .speech
                    .model
                    .clone()
                    .unwrap_or_else(|| "tts-1".to_string());
                Arc::new(OpenAiSynthesizer::new(
                    key,
                    model,
                    config.speech.voice.clone(),
                    config.speech.speed,
                )?)
            }
            SpeechProvider::ElevenLabs => {
                let key = config.api_keys.elevenlabs.clone().ok_or_else(|| {
                    Error::Config("ELEVENLABS_API_KEY required for ElevenLabs TTS".to_string())
                })?;
                let model = config
                    .speech
                    .model
                    .clone()
                    .unwrap_or_else(|| "eleven_monolingual_v1".to_string());
                Arc::new(ElevenLabsSynthesizer::new(
                    key,
                    config.speech.voice.clone(),
                    model,
                )?)
            }
            SpeechProvider::Placeholder => Arc::new(PlaceholderSynthesizer::new()),
        };

        tracing::info!(
            analyzer = analyzer.name(),
            speech = speech.name(),
            delivery = config.delivery.as_str(),
            "strategies selected"
        );

        Ok(Arc::new(Self {
            store,
            analyzer,
            speech,
            delivery: config.delivery,
            max_upload_bytes: config.storage.max_upload_bytes,
        }))
    }
}

/// Build the application router with all routes
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let router = Router::new()
        .merge(analyze::router(state.clone()))
        .merge(audio::router(state.clone()))
        .merge(health::router(state));

    // CORS: the browser frontend may be served from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for the given state and port
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
