//! Filename conventions shared by variants, packaging and alt text.
//!
//! Generated variants are named `<basename>-<width>.avif`. The original
//! upload keeps its own filename unchanged. Because every generated name
//! encodes its width and the variant set holds at most one entry per width,
//! names are unique within a set.
//!
//! ## Display Titles
//!
//! When no alt text is supplied, one is derived from the base name: hyphens
//! and underscores become spaces and whitespace runs collapse.
//! - `sunset-over_the-bay.jpg` → "sunset over the bay"
//! - `IMG__0042.png` → "IMG 0042"

use crate::imaging::OUTPUT_EXTENSION;

/// Filename without its last extension (`photo.final.jpg` → `photo.final`).
///
/// A name without a dot is returned unchanged.
pub fn base_name(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}

/// Lowercased last extension, or empty when there is none.
pub fn extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(dot) => filename[dot + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Name of a generated variant: `<basename>-<width>.avif`.
pub fn variant_filename(base: &str, width: u32) -> String {
    format!("{}-{}.{}", base, width, OUTPUT_EXTENSION)
}

/// Name of the packaged archive for a source: `<basename>-responsive.zip`.
pub fn archive_name(base: &str) -> String {
    format!("{}-responsive.zip", base)
}

/// Human-readable title derived from a base filename.
pub fn display_title(base: &str) -> String {
    base.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
