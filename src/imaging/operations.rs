//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take a
//! source and a target width, compute the parameters, call the backend, and
//! wrap the result as a [`Variant`].

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_variant_height;
use super::params::{Quality, ResizeParams};
use crate::naming::variant_filename;
use crate::types::{SourceImage, Variant};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a resize without executing it.
pub fn plan_resize(source: &SourceImage, target_width: u32, quality: Quality) -> ResizeParams {
    ResizeParams {
        width: target_width,
        height: calculate_variant_height(target_width, (source.width, source.height)),
        quality,
    }
}

/// Produce one re-encoded variant of `source` at `target_width`.
///
/// Fails with [`BackendError::EncodeFailed`] when the encoder errors or
/// yields no bytes. The caller decides whether that is fatal.
pub fn create_variant<B: ImageBackend>(
    backend: &B,
    raster: &B::Raster,
    source: &SourceImage,
    target_width: u32,
    quality: Quality,
) -> Result<Variant> {
    let params = plan_resize(source, target_width, quality);
    let bytes = backend.resize(raster, &params)?;
    if bytes.is_empty() {
        return Err(BackendError::EncodeFailed(format!(
            "encoder produced no output for {}px",
            target_width
        )));
    }

    Ok(Variant {
        filename: variant_filename(source.base_name(), target_width),
        width: params.width,
        height: params.height,
        bytes,
        is_original: false,
    })
}

/// Wrap the untouched upload as a variant: real filename, real bytes,
/// real dimensions.
pub fn original_variant(source: &SourceImage) -> Variant {
    Variant {
        filename: source.display_name.clone(),
        width: source.width,
        height: source.height,
        bytes: source.original_bytes.clone(),
        is_original: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{Dimensions, ImageBackend};
    use crate::test_helpers::source_image;

    fn raster(backend: &MockBackend) -> Dimensions {
        backend.decode(b"upload").unwrap().raster
    }

    #[test]
    fn plan_resize_derives_height() {
        let source = source_image("hero.jpg", 1600, 1067);
        let params = plan_resize(&source, 400, Quality::new(70));
        assert_eq!(params.width, 400);
        assert_eq!(params.height, 267);
        assert_eq!(params.quality.value(), 70);
    }

    #[test]
    fn create_variant_names_and_sizes() {
        let backend = MockBackend::with_dimensions(1600, 1067);
        let source = source_image("hero.jpg", 1600, 1067);

        let variant =
            create_variant(&backend, &raster(&backend), &source, 800, Quality::new(55)).unwrap();

        assert_eq!(variant.filename, "hero-800.avif");
        assert_eq!(variant.width, 800);
        assert_eq!(variant.height, 534);
        assert_eq!(variant.byte_size(), 800);
        assert!(!variant.is_original);

        assert!(matches!(
            backend.get_operations()[1],
            RecordedOp::Resize {
                width: 800,
                height: 534,
                quality: 55,
            }
        ));
    }

    #[test]
    fn create_variant_empty_output_is_encode_failure() {
        let backend = MockBackend::with_dimensions(1000, 500).empty_at(&[500]);
        let source = source_image("wide.png", 1000, 500);

        let result = create_variant(&backend, &raster(&backend), &source, 500, Quality::default());
        assert!(matches!(result, Err(BackendError::EncodeFailed(_))));
    }

    #[test]
    fn create_variant_propagates_backend_error() {
        let backend = MockBackend::with_dimensions(1000, 500).failing_at(&[250]);
        let source = source_image("wide.png", 1000, 500);

        let result = create_variant(&backend, &raster(&backend), &source, 250, Quality::default());
        assert!(result.is_err());
    }

    #[test]
    fn original_variant_copies_upload() {
        let source = source_image("My Photo.jpeg", 640, 480);
        let variant = original_variant(&source);

        assert_eq!(variant.filename, "My Photo.jpeg");
        assert_eq!((variant.width, variant.height), (640, 480));
        assert_eq!(variant.bytes, source.original_bytes);
        assert!(variant.is_original);
    }
}
