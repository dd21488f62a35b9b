//! Shared test utilities
#![allow(dead_code)] // not every test binary uses every helper

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use image::{DynamicImage, Rgb, RgbImage};
use vista_gateway::analyzer::PixelSampleAnalyzer;
use vista_gateway::api::{self, ApiState};
use vista_gateway::config::AudioDelivery;
use vista_gateway::speech::PlaceholderSynthesizer;
use vista_gateway::storage::MediaStore;

/// Build a test router over temp directories with the pixel-sampling
/// analyzer and the placeholder synthesizer
pub fn test_router(dir: &tempfile::TempDir, delivery: AudioDelivery) -> Router {
    let store = MediaStore::new(dir.path().join("uploads"), dir.path().join("audio"))
        .expect("failed to create media store");

    let state = Arc::new(ApiState {
        store,
        analyzer: Arc::new(PixelSampleAnalyzer::new()),
        speech: Arc::new(PlaceholderSynthesizer::new()),
        delivery,
        max_upload_bytes: 10 * 1024 * 1024,
    });

    api::router(state)
}

/// Encode a solid-color RGB image as PNG bytes
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    png_bytes(&DynamicImage::ImageRgb8(img))
}

/// Encode any image as PNG bytes
pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode PNG");
    buf.into_inner()
}

/// Build a multipart/form-data body with a single field
///
/// Returns the content type (with boundary) and the encoded body.
pub fn multipart_body(
    field_name: &str,
    filename: Option<&str>,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    let boundary = "vista-test-boundary";
    let mut body = Vec::new();

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    let disposition = match filename {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{name}\"\r\n"
        ),
        None => format!("Content-Disposition: form-data; name=\"{field_name}\"\r\n"),
    };
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}
