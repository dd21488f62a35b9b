//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;
use vista_gateway::config::AudioDelivery;

mod common;
use common::{multipart_body, solid_png, test_router};

/// POST a multipart body to /analyze
fn analyze_request(content_type: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn analyze_without_image_field_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let (content_type, body) = multipart_body("file", Some("photo.png"), "image/png", b"data");
    let response = app.oneshot(analyze_request(&content_type, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No image provided");
}

#[tokio::test]
async fn analyze_with_empty_filename_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let (content_type, body) = multipart_body("image", Some(""), "image/png", b"data");
    let response = app.oneshot(analyze_request(&content_type, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No image selected");
}

#[tokio::test]
async fn analyze_inline_returns_description_and_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let png = solid_png(100, 100, [0, 0, 0]);
    let (content_type, body) = multipart_body("image", Some("black.png"), "image/png", &png);
    let response = app.oneshot(analyze_request(&content_type, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;

    let description = json["description"].as_str().unwrap();
    assert!(description.contains("dark, minimalist scene"));
    assert!(description.ends_with("The image is 100x100 pixels, in PNG format."));

    let audio_url = json["audio_url"].as_str().unwrap();
    assert!(audio_url.starts_with("data:audio/mp3;base64,"));
}

#[tokio::test]
async fn analyze_referenced_serves_audio() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Referenced);

    let png = solid_png(64, 64, [90, 140, 240]);
    let (content_type, body) = multipart_body("image", Some("sky.png"), "image/png", &png);
    let response = app
        .clone()
        .oneshot(analyze_request(&content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;

    let audio_url = json["audio_url"].as_str().unwrap().to_string();
    assert!(audio_url.starts_with("/audio/"));
    assert!(audio_url.ends_with(".mp3"));

    // The referenced URL must serve the synthesized audio
    let audio_response = app
        .oneshot(
            Request::builder()
                .uri(audio_url.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(audio_response.status(), StatusCode::OK);
    assert_eq!(
        audio_response.headers()[header::CONTENT_TYPE],
        "audio/mpeg"
    );
    let bytes = axum::body::to_bytes(audio_response.into_body(), usize::MAX)
        .await
        .unwrap();
    // placeholder synthesizer output: MPEG frame sync
    assert_eq!(bytes[..2], [0xFF, 0xFB]);
}

#[tokio::test]
async fn corrupted_image_still_returns_200_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let (content_type, body) =
        multipart_body("image", Some("broken.jpg"), "image/jpeg", b"definitely not an image");
    let response = app.oneshot(analyze_request(&content_type, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let description = json["description"].as_str().unwrap();
    assert!(description.contains("Unable to analyze"));
    // degraded analysis still gets narrated
    assert!(json["audio_url"].is_string());
}

#[tokio::test]
async fn identical_bytes_yield_identical_descriptions() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let png = solid_png(100, 100, [60, 200, 60]);

    let (content_type, body) = multipart_body("image", Some("first.png"), "image/png", &png);
    let first = json_body(
        app.clone()
            .oneshot(analyze_request(&content_type, body))
            .await
            .unwrap(),
    )
    .await;

    let (content_type, body) = multipart_body("image", Some("second.png"), "image/png", &png);
    let second = json_body(app.oneshot(analyze_request(&content_type, body)).await.unwrap()).await;

    assert_eq!(first["description"], second["description"]);
}

#[tokio::test]
async fn missing_audio_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audio/does-not-exist.mp3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn traversal_audio_name_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audio/..evil.mp3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn status_endpoint_reports_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir, AudioDelivery::Inline);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["analyzer"], "pixel-sampling");
    assert_eq!(json["synthesizer"], "placeholder");
    assert_eq!(json["delivery"], "inline");
}
