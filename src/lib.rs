//! # Simple Srcset
//!
//! Turn one uploaded photo into a ready-to-paste responsive image: a handful
//! of re-encoded AVIF variants at sensible widths, plus the `<img srcset>`
//! element that lets the browser pick between them.
//!
//! # Architecture: Four-Step Pipeline
//!
//! ```text
//! 1. Plan       source width (+ rendered width)  →  target widths
//! 2. Rasterize  decoded raster × width           →  AVIF variants
//! 3. Assemble   variants + untouched original    →  VariantSet (one per width)
//! 4. Markup     VariantSet + preferences         →  <img src srcset sizes ...>
//! ```
//!
//! Steps 1, 3 and 4 are pure functions over plain data and are unit tested
//! without encoding a single pixel. Step 2 sits behind the
//! [`imaging::ImageBackend`] trait so the session can be driven by a recording
//! mock in tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`planner`] | Width planning from the original or the rendered width; editable [`planner::WidthList`] |
//! | [`imaging`] | Decode uploads, resize + encode AVIF variants (the Rasterizer) |
//! | [`variants`] | Merge generated variants with the original into a [`variants::VariantSet`] |
//! | [`markup`] | Synthesize the responsive `<img>` element |
//! | [`session`] | One loaded image, its plan, and sequential generation with progress events |
//! | [`export`] | Package the results to disk, copy markup to the clipboard |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`types`] | `SourceImage` and `Variant`, shared by every step |
//! | [`naming`] | Filename conventions for variants and packages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## AVIF-Only Output
//!
//! Every generated variant is AVIF. One modern format keeps the markup to a
//! single `<img>` with no `<picture>` fallbacks. The original upload rides
//! along untouched as the widest candidate, which covers browsers that
//! cannot decode AVIF when it is chosen as `src`.
//!
//! ## Sequential Encoding
//!
//! Exactly one decoded raster is held per session and widths are encoded one
//! after another. Large uploads therefore cost one raster plus one encode
//! buffer of memory, never one per width.
//!
//! ## Nice Widths
//!
//! Planned widths are rounded to 10/25/50 px increments by magnitude so
//! filenames and `srcset` entries read cleanly (`hero-800.avif`, not
//! `hero-797.avif`). The original width is always kept unrounded.

pub mod config;
pub mod export;
pub mod imaging;
pub mod markup;
pub mod naming;
pub mod output;
pub mod planner;
pub mod session;
pub mod types;
pub mod variants;

#[cfg(test)]
pub(crate) mod test_helpers;
