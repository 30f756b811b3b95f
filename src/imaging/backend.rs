//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: decode an uploaded byte buffer, and resize + re-encode a decoded
//! raster into output bytes.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and statically
//! linked. Tests use the recording `MockBackend` below.

use super::params::ResizeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),
    #[error("Encoding failed: {0}")]
    EncodeFailed(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded upload: the backend's raster plus what we learned while decoding.
#[derive(Debug, Clone)]
pub struct Decoded<R> {
    pub raster: R,
    pub dimensions: Dimensions,
    /// Container format sniffed from the bytes (`"JPEG"`, `"PNG"`, ...), if known.
    pub format: Option<String>,
}

/// Trait for image processing backends.
///
/// `Raster` is whatever in-memory representation the backend decodes into.
/// Only one raster is alive per session, and encodes run one at a time.
pub trait ImageBackend {
    type Raster;

    /// Decode raw upload bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Decoded<Self::Raster>, BackendError>;

    /// Scale `raster` to exactly `params.width × params.height` and encode it
    /// with the fixed output codec. May return an empty buffer when the
    /// encoder yields nothing; callers treat that as a failure.
    fn resize(&self, raster: &Self::Raster, params: &ResizeParams) -> Result<Vec<u8>, BackendError>;
}
