//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format` |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image::load_from_memory` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |

use super::backend::{BackendError, Decoded, Dimensions, ImageBackend};
use super::params::{Quality, ResizeParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

/// File extension of every generated variant.
pub const OUTPUT_EXTENSION: &str = "avif";

/// rav1e speed preset: 1 is slowest/best, 10 fastest. 6 keeps a
/// multi-width run interactive.
const AVIF_SPEED: u8 = 6;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase display name for a sniffed container format (`image/jpeg` → `JPEG`).
fn format_name(format: ImageFormat) -> String {
    let mime = format.to_mime_type();
    mime.rsplit('/').next().unwrap_or(mime).to_uppercase()
}

/// Encoder quality byte. Saturates instead of wrapping.
fn avif_quality(quality: Quality) -> u8 {
    u8::try_from(quality.value()).unwrap_or(100).min(100)
}

/// Encode to AVIF in memory.
fn encode_avif(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    // rav1e only takes 8-bit RGB(A); normalize whatever was decoded
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::avif::AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, avif_quality(quality));
    normalized
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::EncodeFailed(format!("AVIF encode failed: {}", e)))?;
    Ok(buffer)
}

impl ImageBackend for RustBackend {
    type Raster = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<Decoded<DynamicImage>, BackendError> {
        let format = image::guess_format(bytes).ok();
        let img = image::load_from_memory(bytes)
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::DecodeFailed("image has no pixels".to_string()));
        }

        Ok(Decoded {
            dimensions: Dimensions {
                width: img.width(),
                height: img.height(),
            },
            format: format.map(format_name),
            raster: img,
        })
    }

    fn resize(&self, raster: &DynamicImage, params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        // Direct scale to the exact box: no crop, no letterboxing
        let resized = raster.resize_exact(params.width, params.height, FilterType::Lanczos3);
        encode_avif(&resized, params.quality)
    }
}
