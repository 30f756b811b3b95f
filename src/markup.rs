//! Responsive `<img>` markup synthesis.
//!
//! Given a finished [`VariantSet`] the builder produces the one artifact with
//! a bit-exact shape: a self-closing `<img>` element, one attribute per line,
//! in this order:
//!
//! ```text
//! <img
//!  src="/images/hero-1200.avif"
//!  srcset="/images/hero-400.avif 400w,
//!  /images/hero-800.avif 800w,
//!  /images/hero-1200.avif 1200w,
//!  /images/hero.jpg 1600w"
//!  sizes="(max-width: 768px) 50vw, 1200px"
//!  width="1200"
//!  height="800"
//!  alt="hero"
//!  loading="lazy"
//! />
//! ```
//!
//! ## Choices
//!
//! - **Rendered width**: the caller's preference when positive, else the
//!   largest variant width.
//! - **Fallback `src`**: the first variant at least as wide as the rendered
//!   width, else the largest. `width`/`height` describe that variant.
//! - **`sizes`**: below the breakpoint the image takes a fixed fraction of the
//!   viewport; above it, the rendered width in pixels.
//! - **`alt`**: caller text when non-blank, else derived from the filename.
//!
//! Attribute values are HTML-escaped with maud, so a quote in a filename or
//! alt text cannot break out of the attribute.

use crate::config::MarkupConfig;
use crate::naming::display_title;
use crate::types::Variant;
use crate::variants::VariantSet;

/// Caller inputs that shape the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupRequest {
    /// Expected layout width in CSS pixels. `None` or `Some(0)` means "largest variant".
    pub rendered_width: Option<u32>,
    /// Manual alt text. Blank means "derive from filename".
    pub alt_text: Option<String>,
}

/// The synthesized element plus the decisions that went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgMarkup {
    pub rendered_width: u32,
    /// Filename of the variant used for `src`.
    pub fallback: String,
    pub srcset: String,
    pub sizes: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
    /// The complete element, ready for the clipboard.
    pub html: String,
}

/// Resolve the rendered width: a positive preference, else the largest width.
pub fn pick_rendered_width(preference: Option<u32>, set: &VariantSet) -> u32 {
    match preference {
        Some(width) if width > 0 => width,
        _ => set.largest().map(|v| v.width).unwrap_or(0),
    }
}

/// First variant at least `rendered_width` wide, else the largest.
pub fn pick_fallback(set: &VariantSet, rendered_width: u32) -> Option<&Variant> {
    set.variants()
        .iter()
        .find(|v| v.width >= rendered_width)
        .or_else(|| set.largest())
}

/// Join the virtual base path and a filename with exactly one slash.
pub fn reference_path(base_path: &str, filename: &str) -> String {
    if base_path.is_empty() || base_path.ends_with('/') {
        format!("{}{}", base_path, filename)
    } else {
        format!("{}/{}", base_path, filename)
    }
}

/// `<path> <width>w` entries in ascending width order, comma-newline separated.
pub fn build_srcset(set: &VariantSet, base_path: &str) -> String {
    set.variants()
        .iter()
        .map(|v| format!("{} {}w", reference_path(base_path, &v.filename), v.width))
        .collect::<Vec<_>>()
        .join(",\n ")
}

/// Two-branch layout rule: fraction of the viewport below the breakpoint,
/// the rendered width above it.
pub fn build_sizes(config: &MarkupConfig, rendered_width: u32) -> String {
    format!(
        "(max-width: {}px) {}, {}px",
        config.breakpoint, config.small_viewport_size, rendered_width
    )
}

/// Alt text: trimmed manual text if any, else a title derived from the base name.
pub fn build_alt_text(manual: Option<&str>, base_name: &str) -> String {
    match manual.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => display_title(base_name),
    }
}

/// HTML-escape an attribute value.
fn escape(value: &str) -> String {
    maud::html! { (value) }.into_string()
}

/// Build the responsive `<img>` for `set`.
///
/// Returns `None` only for an empty set, which a generation run never
/// produces (the original is always present).
pub fn build_markup(
    set: &VariantSet,
    base_name: &str,
    request: &MarkupRequest,
    config: &MarkupConfig,
) -> Option<ImgMarkup> {
    let rendered_width = pick_rendered_width(request.rendered_width, set);
    let fallback = pick_fallback(set, rendered_width)?;

    let srcset = build_srcset(set, &config.base_path);
    let sizes = build_sizes(config, rendered_width);
    let alt = build_alt_text(request.alt_text.as_deref(), base_name);
    let src = reference_path(&config.base_path, &fallback.filename);

    let html = format!(
        "<img\n \
         src=\"{src}\"\n \
         srcset=\"{srcset}\"\n \
         sizes=\"{sizes}\"\n \
         width=\"{width}\"\n \
         height=\"{height}\"\n \
         alt=\"{alt}\"\n \
         loading=\"{loading}\"\n\
         />",
        src = escape(&src),
        srcset = escape(&srcset),
        sizes = escape(&sizes),
        width = fallback.width,
        height = fallback.height,
        alt = escape(&alt),
        loading = escape(&config.loading),
    );

    Some(ImgMarkup {
        rendered_width,
        fallback: fallback.filename.clone(),
        srcset,
        sizes,
        width: fallback.width,
        height: fallback.height,
        alt,
        html,
    })
}
