//! Aspect-ratio scene heuristic
//!
//! The simplest strategy: a canned description chosen by the width/height
//! ratio alone. Kept for environments where pixel access or a vision API is
//! not warranted.

use async_trait::async_trait;

use super::{SceneAnalysis, SceneAnalyzer};

/// Ratio beyond which an image counts as landscape or portrait
const ELONGATION_RATIO: f64 = 1.5;

/// Analyzer keyed on image orientation
#[derive(Debug, Default)]
pub struct AspectRatioAnalyzer;

impl AspectRatioAnalyzer {
    /// Create the analyzer
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SceneAnalyzer for AspectRatioAnalyzer {
    async fn analyze(&self, data: &[u8], _mime_type: &str) -> SceneAnalysis {
        let Ok(img) = image::load_from_memory(data) else {
            tracing::warn!("image decode failed, degrading to fallback description");
            return SceneAnalysis::fallback();
        };

        let width = f64::from(img.width());
        let height = f64::from(img.height());

        let (scene_type, description) = if width > height * ELONGATION_RATIO {
            (
                "landscape",
                "This appears to be a wide landscape image. I can see a beautiful outdoor \
                 scene with natural elements. The colors suggest it might be depicting a \
                 scenic view, possibly during daylight hours.",
            )
        } else if height > width * ELONGATION_RATIO {
            (
                "portrait",
                "This appears to be a portrait-oriented image. It seems to feature a vertical \
                 composition, possibly of a person or a tall structure. The framing suggests \
                 focus on a central subject.",
            )
        } else {
            (
                "square",
                "This appears to be a standard rectangular or square image. The composition \
                 indicates a balanced scene, possibly depicting a group of subjects or a \
                 detailed environment with multiple elements.",
            )
        };

        SceneAnalysis {
            description: description.to_string(),
            scene_type: Some(scene_type.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "aspect-ratio"
    }
}
