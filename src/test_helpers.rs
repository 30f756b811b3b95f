//! Shared test utilities for the simple-srcset test suite.
//!
//! Provides fixture builders for the pipeline's data types and small
//! synthetic encoded images for the real backend.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = source_image("hero.jpg", 1600, 1067);
//! let set = VariantSet::assemble(
//!     vec![generated(400, 10), generated(800, 20)],
//!     original("hero.jpg", 1600, 99),
//! );
//! let png = png_bytes(32, 16);
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::types::{SourceImage, Variant};

// =========================================================================
// Synthetic encoded images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    })
}

/// A `width × height` gradient encoded as JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// A `width × height` gradient encoded as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

// =========================================================================
// Pipeline fixtures
// =========================================================================

/// A decoded source with placeholder bytes. Dimensions are taken at face value.
pub fn source_image(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage {
        width,
        height,
        original_bytes: vec![0xAB; 64],
        display_name: name.to_string(),
        format: "PNG".to_string(),
    }
}

/// A generated variant named `src-<width>.avif` carrying `size` bytes.
pub fn generated(width: u32, size: usize) -> Variant {
    Variant {
        filename: crate::naming::variant_filename("src", width),
        width,
        height: (width / 2).max(1),
        bytes: vec![0; size],
        is_original: false,
    }
}

/// The original upload as a variant, `size` bytes long.
pub fn original(name: &str, width: u32, size: usize) -> Variant {
    Variant {
        filename: name.to_string(),
        width,
        height: (width / 2).max(1),
        bytes: vec![1; size],
        is_original: true,
    }
}

// =========================================================================
// Archives
// =========================================================================

/// Every entry of a zip archive, keyed by name.
pub fn zip_entries(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).unwrap();
            (file.name().to_string(), bytes)
        })
        .collect()
}
