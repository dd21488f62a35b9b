//! Image analysis endpoint
//!
//! Orchestrates the upload → analyze → synthesize pipeline behind
//! `POST /analyze`. Each request is processed start-to-finish with fresh
//! identifiers; there is no shared mutable state and no retry of external
//! calls.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use base64::Engine;
use serde::Serialize;

use super::ApiState;
use crate::config::AudioDelivery;

/// Build the analyze router
pub fn router(state: Arc<ApiState>) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Analysis response body
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Natural-language description of the scene
    pub description: String,
    /// Coarse scene label, present only for strategies that produce one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_type: Option<String>,
    /// Inline data URL or `/audio/{filename}` reference; null when speech
    /// synthesis failed
    pub audio_url: Option<String>,
}

/// Uploaded image field
struct ImageUpload {
    data: Vec<u8>,
    filename: String,
    mime_type: String,
}

/// Analyze an uploaded image
async fn analyze(
    State(state): State<Arc<ApiState>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    let upload = read_image_field(multipart).await?;

    let stored = state
        .store
        .save_upload(&upload.data, &upload.filename)
        .await
        .map_err(AnalyzeError::internal)?;

    let analysis = state
        .analyzer
        .analyze(&upload.data, &upload.mime_type)
        .await;
    tracing::debug!(
        upload_id = %stored.id,
        analyzer = state.analyzer.name(),
        scene_type = ?analysis.scene_type,
        "image analyzed"
    );

    // Speech failures degrade to a text-only response
    let audio_url = match state.speech.synthesize(&analysis.description).await {
        Ok(audio) => Some(deliver_audio(&state, &audio).await?),
        Err(e) => {
            tracing::warn!(
                error = %e,
                synthesizer = state.speech.name(),
                "speech synthesis failed"
            );
            None
        }
    };

    Ok(Json(AnalyzeResponse {
        description: analysis.description,
        scene_type: analysis.scene_type,
        audio_url,
    }))
}

/// Extract the `image` multipart field
async fn read_image_field(mut multipart: Multipart) -> Result<ImageUpload, AnalyzeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AnalyzeError::MalformedRequest)?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AnalyzeError::EmptyFilename);
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|_| AnalyzeError::MalformedRequest)?;

        return Ok(ImageUpload {
            data: data.to_vec(),
            filename,
            mime_type,
        });
    }

    Err(AnalyzeError::MissingImage)
}

/// Store synthesized audio and produce the client-facing URL
async fn deliver_audio(state: &ApiState, audio: &[u8]) -> Result<String, AnalyzeError> {
    let stored = state
        .store
        .save_audio(audio)
        .await
        .map_err(AnalyzeError::internal)?;

    Ok(match state.delivery {
        AudioDelivery::Inline => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(audio);
            format!("data:audio/mp3;base64,{encoded}")
        }
        AudioDelivery::Referenced => format!("/audio/{}", stored.filename),
    })
}

/// Analyze endpoint errors
///
/// Client-facing messages are stable; raw causes are only logged.
#[derive(Debug)]
pub enum AnalyzeError {
    /// No `image` field in the multipart body
    MissingImage,
    /// `image` field present but the filename is empty
    EmptyFilename,
    /// Multipart body could not be read
    MalformedRequest,
    /// Storage or other unexpected failure
    Internal,
}

impl AnalyzeError {
    fn internal(error: crate::Error) -> Self {
        tracing::error!(error = %error, "analyze request failed");
        Self::Internal
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        let (status, error) = match self {
            Self::MissingImage => (StatusCode::BAD_REQUEST, "No image provided"),
            Self::EmptyFilename => (StatusCode::BAD_REQUEST, "No image selected"),
            Self::MalformedRequest => (StatusCode::BAD_REQUEST, "Invalid multipart request"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
