//! Pixel-sampling scene heuristic
//!
//! Samples pixels on a fixed stride, buckets colors into coarse RGB bins,
//! and classifies the scene from overall brightness and the dominant bucket.
//! The computation is a pure function of the pixel data and the constants
//! below, so identical image bytes always produce identical descriptions.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{SceneAnalysis, SceneAnalyzer};

/// Sample every Nth pixel in both dimensions
const SAMPLE_STRIDE: u32 = 10;
/// Integer divisor collapsing each channel into a coarse bin (6 per channel)
const BUCKET_DIVISOR: u8 = 50;
/// Compared against the scaled brightness `total / (samples / 100)`
const BRIGHTNESS_THRESHOLD: f64 = 150.0;
/// Scenes with more distinct buckets than this count as visually busy
const DISTINCT_BUCKET_THRESHOLD: usize = 20;

/// Analyzer sampling pixel brightness and color distribution
#[derive(Debug, Default)]
pub struct PixelSampleAnalyzer;

impl PixelSampleAnalyzer {
    /// Create the analyzer
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SceneAnalyzer for PixelSampleAnalyzer {
    async fn analyze(&self, data: &[u8], _mime_type: &str) -> SceneAnalysis {
        match describe(data) {
            Some(description) => SceneAnalysis {
                description,
                scene_type: None,
            },
            None => {
                tracing::warn!("image decode failed, degrading to fallback description");
                SceneAnalysis::fallback()
            }
        }
    }

    fn name(&self) -> &'static str {
        "pixel-sampling"
    }
}

/// Brightness and color statistics over the sampled pixels
struct SampleStats {
    /// Scaled brightness: channel-mean total divided by (samples / 100)
    brightness: f64,
    /// Most frequent coarse RGB bin; `None` for grayscale or empty images
    dominant: Option<(u8, u8, u8)>,
    /// Number of distinct bins seen
    distinct_buckets: usize,
}

fn describe(data: &[u8]) -> Option<String> {
    let format = image::guess_format(data).ok();
    let img = image::load_from_memory(data).ok()?;
    let (width, height) = (img.width(), img.height());

    let stats = sample(&img);
    let body = classify(&stats);
    let format_label =
        format.map_or_else(|| "UNKNOWN".to_string(), |f| format!("{f:?}").to_uppercase());

    Some(format!(
        "{body} The image is {width}x{height} pixels, in {format_label} format."
    ))
}

/// Sample pixels on the fixed stride
///
/// Color images contribute the unweighted mean of their first three channels
/// to the brightness total and one coarse RGB bin per sample; grayscale
/// images contribute raw luma values and no bins.
#[allow(clippy::cast_possible_truncation)]
fn sample(img: &image::DynamicImage) -> SampleStats {
    let (width, height) = (img.width(), img.height());
    let mut brightness_total = 0.0_f64;
    let mut samples = 0_u32;
    // bin -> (count, first-seen index); ties on count break toward the
    // earlier first-seen bin
    let mut buckets: HashMap<(u8, u8, u8), (u32, u32)> = HashMap::new();

    if img.color().has_color() {
        let rgb = img.to_rgb8();
        for y in (0..height).step_by(SAMPLE_STRIDE as usize) {
            for x in (0..width).step_by(SAMPLE_STRIDE as usize) {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                brightness_total += f64::from(u16::from(r) + u16::from(g) + u16::from(b)) / 3.0;
                let bin = (r / BUCKET_DIVISOR, g / BUCKET_DIVISOR, b / BUCKET_DIVISOR);
                let next_index = buckets.len() as u32;
                buckets.entry(bin).or_insert((0, next_index)).0 += 1;
                samples += 1;
            }
        }
    } else {
        let luma = img.to_luma8();
        for y in (0..height).step_by(SAMPLE_STRIDE as usize) {
            for x in (0..width).step_by(SAMPLE_STRIDE as usize) {
                brightness_total += f64::from(luma.get_pixel(x, y).0[0]);
                samples += 1;
            }
        }
    }

    let brightness = if samples == 0 {
        0.0
    } else {
        brightness_total / (f64::from(samples) / 100.0)
    };

    let dominant = buckets
        .iter()
        .max_by_key(|&(_, &(count, first_seen))| (count, std::cmp::Reverse(first_seen)))
        .map(|(&bin, _)| bin);

    SampleStats {
        brightness,
        dominant,
        distinct_buckets: buckets.len(),
    }
}

fn classify(stats: &SampleStats) -> &'static str {
    let bright = stats.brightness > BRIGHTNESS_THRESHOLD;
    let busy = stats.distinct_buckets > DISTINCT_BUCKET_THRESHOLD;

    if bright {
        match stats.dominant {
            Some((r, g, b)) if b > r && b > g => {
                if busy {
                    "This looks like an outdoor scene with a blue sky. There may be trees, \
                     buildings, or people in the frame."
                } else {
                    "This looks like an outdoor scene with a blue sky and few distinct \
                     elements, perhaps open water or a clear horizon."
                }
            }
            Some((r, g, b)) if g > r && g > b => {
                "This appears to be a natural landscape with plenty of greenery, possibly a \
                 park, field, or forest."
            }
            _ => "This appears to be a warm-toned scene, possibly indoors or captured around \
                 sunset.",
        }
    } else if busy {
        "This appears to be a low-light scene, possibly indoors or at night, with several \
         distinct elements."
    } else {
        "This appears to be a dark, minimalist scene with few distinct elements."
    }
}
