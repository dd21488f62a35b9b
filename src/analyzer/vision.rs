//! Cloud vision analysis
//!
//! Sends the image to Anthropic's messages API and uses the model's reply as
//! the scene description. API failures degrade to the fixed fallback, same
//! as decode failures in the local strategies.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{SceneAnalysis, SceneAnalyzer};
use crate::{Error, Result};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const PROMPT: &str = "Describe this scene in two or three sentences, as if narrating it aloud \
     to someone who cannot see the image. Mention the setting and the main subjects.";

/// Client for the Anthropic vision endpoint
pub struct VisionClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct VisionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<VisionMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct VisionMessage<'a> {
    role: &'a str,
    content: Vec<Block<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block<'a> {
    Text { text: &'a str },
    Image { source: Source<'a> },
}

#[derive(Debug, Serialize)]
struct Source<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    media_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct VisionResponse {
    content: Vec<ReplyBlock>,
}

#[derive(Debug, Deserialize)]
struct ReplyBlock {
    text: Option<String>,
}

impl VisionClient {
    /// Create a new vision client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Anthropic API key required for cloud vision".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
        })
    }

    /// Create with a specific model
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Describe an image
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or replies without text
    pub async fn describe(&self, data: &[u8], mime_type: &str) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);

        let request = VisionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![VisionMessage {
                role: "user",
                content: vec![
                    Block::Image {
                        source: Source {
                            kind: "base64",
                            media_type: supported_media_type(mime_type),
                            data: encoded,
                        },
                    },
                    Block::Text { text: PROMPT },
                ],
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Vision(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Vision(format!("API error {status}: {body}")));
        }

        let reply: VisionResponse = response
            .json()
            .await
            .map_err(|e| Error::Vision(format!("parse error: {e}")))?;

        let description = reply
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(" ");

        if description.is_empty() {
            return Err(Error::Vision("empty response from vision API".to_string()));
        }

        tracing::debug!(model = %self.model, "scene described by vision API");
        Ok(description)
    }
}

/// Collapse the client MIME type onto the formats the API accepts
fn supported_media_type(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "image/png" => "image/png",
        "image/gif" => "image/gif",
        "image/webp" => "image/webp",
        // jpeg, jpg, and anything unknown default to jpeg
        _ => "image/jpeg",
    }
}

/// Analyzer strategy backed by [`VisionClient`]
pub struct CloudVisionAnalyzer {
    client: VisionClient,
}

impl CloudVisionAnalyzer {
    /// Create the analyzer over an existing client
    #[must_use]
    pub fn new(client: VisionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SceneAnalyzer for CloudVisionAnalyzer {
    async fn analyze(&self, data: &[u8], mime_type: &str) -> SceneAnalysis {
        match self.client.describe(data, mime_type).await {
            Ok(description) => SceneAnalysis {
                description,
                scene_type: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "vision analysis failed, degrading to fallback");
                SceneAnalysis::fallback()
            }
        }
    }

    fn name(&self) -> &'static str {
        "cloud-vision"
    }
}
