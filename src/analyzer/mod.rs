//! Scene analysis strategies
//!
//! Three interchangeable analyzers compute a textual description from image
//! data: a canned description keyed on aspect ratio, a pixel-sampling
//! heuristic, and a cloud vision API call. The strategy is selected once at
//! startup.

mod aspect;
mod pixels;
mod vision;

pub use aspect::AspectRatioAnalyzer;
pub use pixels::PixelSampleAnalyzer;
pub use vision::{CloudVisionAnalyzer, VisionClient};

use async_trait::async_trait;
use serde::Serialize;

/// Fallback description for images that cannot be analyzed
///
/// Analysis is best-effort: decode and provider failures degrade to this
/// fixed text instead of failing the request.
pub const FALLBACK_DESCRIPTION: &str = "Unable to analyze this image in detail. \
     It appears to be a photograph, but its contents could not be determined.";

/// Outcome of scene analysis
#[derive(Debug, Clone, Serialize)]
pub struct SceneAnalysis {
    /// Natural-language description of the scene
    pub description: String,
    /// Coarse scene label, when the strategy produces one
    pub scene_type: Option<String>,
}

impl SceneAnalysis {
    /// Degraded analysis for undecodable or unprocessable images
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            description: FALLBACK_DESCRIPTION.to_string(),
            scene_type: None,
        }
    }
}

/// Strategy computing a scene description from image bytes
#[async_trait]
pub trait SceneAnalyzer: Send + Sync {
    /// Analyze an image
    ///
    /// Never fails: implementations degrade to [`SceneAnalysis::fallback`]
    /// when the image cannot be decoded or the backing provider errors.
    async fn analyze(&self, data: &[u8], mime_type: &str) -> SceneAnalysis;

    /// Strategy name for logging and the status endpoint
    fn name(&self) -> &'static str;
}
