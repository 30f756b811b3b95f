//! Image processing: the Rasterizer.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode upload** | `image::load_from_memory` |
//! | **Resize → AVIF** | `resize_exact` (Lanczos3) + rav1e encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Decoded, Dimensions, ImageBackend};
pub use calculations::{FALLBACK_WIDTH, calculate_generation_widths, calculate_variant_height};
pub use operations::{create_variant, original_variant, plan_resize};
pub use params::{EncoderProfile, Quality, ResizeParams};
pub use rust_backend::{OUTPUT_EXTENSION, RustBackend};
