//! Audio artifact serving
//!
//! `GET /audio/{filename}` streams a previously synthesized file from the
//! audio directory.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use super::ApiState;

/// Build the audio router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/audio/{filename}", get(serve_audio))
        .with_state(state)
}

#[derive(Serialize)]
struct NotFoundResponse {
    error: &'static str,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "audio file not found",
        }),
    )
        .into_response()
}

/// Serve a stored audio file
async fn serve_audio(
    State(state): State<Arc<ApiState>>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = state.store.resolve_audio(&filename) else {
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&filename))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "audio read failed");
            not_found()
        }
    }
}

/// Content type by file extension
fn content_type(filename: &str) -> &'static str {
    match std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("wav") => "audio/wav",
        _ => "audio/mpeg",
    }
}
