//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) (which decide what variant to build)
//! and the [`backend`](super::backend) (which does the pixel work), so the
//! operations can be tested against a mock backend.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 70). Clamped on construction.
//! - [`EncoderProfile`]: Which quality a session encodes with, picked once at startup.
//! - [`ResizeParams`]: Target dimensions and quality for one variant.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
///
/// Only [`Quality::new`] builds one, so the value is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(70)
    }
}

/// Encoder quality policy for a session.
///
/// Some encoders produce visibly heavier output at the same nominal quality.
/// `Reduced` compensates with a lower setting. The choice is made once when a
/// session starts and never re-evaluated per image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderProfile {
    #[default]
    Standard,
    Reduced,
}

impl EncoderProfile {
    /// Pick the quality for this profile from the two configured values.
    pub fn quality(self, standard: u32, reduced: u32) -> Quality {
        match self {
            EncoderProfile::Standard => Quality::new(standard),
            EncoderProfile::Reduced => Quality::new(reduced),
        }
    }
}

/// Parameters for one resize + re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
