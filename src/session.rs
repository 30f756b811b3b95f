//! The working session: one loaded image, its width plan, and the results of
//! the last generation run.
//!
//! ## Lifecycle
//!
//! ```text
//! Session::new ──load──▶ source + auto width plan
//!                 │
//!                 ├─ widths_mut(): add / remove / reset
//!                 │
//!                 └─ generate ──▶ variants + markup (replaced every run)
//!
//! clear ──▶ back to empty; load replaces everything wholesale
//! ```
//!
//! ## Generation pipeline
//!
//! A run is an ordered sequence of blocking steps, executed on the calling
//! thread one at a time:
//!
//! 1. Filter the plan to widths ≤ source width (fallback to `min(400, width)`
//!    when nothing is left).
//! 2. For each width, in ascending order: resize + encode. Only one encode
//!    is in flight, next to the single decoded raster.
//! 3. Append the untouched original, merge by width.
//! 4. Build the markup.
//!
//! A width whose encode fails is logged, reported, and skipped; its siblings
//! still run. Decode failures happen at [`Session::load`], before any width is
//! touched, and leave the session empty.
//!
//! Progress is reported through an optional channel of [`GenerateEvent`]s.
//! The `&mut self` receiver keeps a second run from starting while one is in
//! progress.

use crate::config::MarkupConfig;
use crate::imaging::{
    BackendError, ImageBackend, Quality, calculate_generation_widths, create_variant,
    original_variant,
};
use crate::markup::{ImgMarkup, MarkupRequest, build_markup};
use crate::naming;
use crate::planner::{self, WidthList};
use crate::types::SourceImage;
use crate::variants::VariantSet;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No image loaded")]
    NoSource,
    /// Markup needs at least one variant. The original is always appended,
    /// so a run never hits this.
    #[error("No variants to build markup from")]
    NoVariants,
    #[error("Could not decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: BackendError,
    },
}

/// A file handed over by whatever acquired it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Progress notifications emitted during [`Session::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateEvent {
    Started {
        total: usize,
    },
    /// About to encode `width` (1-based `index` of `total`).
    Processing {
        width: u32,
        index: usize,
        total: usize,
    },
    Encoded {
        width: u32,
        filename: String,
        byte_size: usize,
    },
    /// The encode for `width` failed and the width was dropped.
    Skipped {
        width: u32,
        message: String,
    },
    Finished {
        count: usize,
        total_bytes: usize,
    },
}

/// A width that failed to encode during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeFailure {
    pub width: u32,
    pub message: String,
}

/// Everything a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub variants: VariantSet,
    pub markup: ImgMarkup,
    /// Widths that were attempted, after filtering and fallback.
    pub attempted: Vec<u32>,
    pub diagnostics: Vec<EncodeFailure>,
}

impl GenerationReport {
    pub fn total_bytes(&self) -> usize {
        self.variants.total_bytes()
    }
}

struct Loaded<R> {
    image: SourceImage,
    raster: R,
}

/// Single-image working state.
pub struct Session<B: ImageBackend> {
    backend: B,
    quality: Quality,
    markup_config: MarkupConfig,
    source: Option<Loaded<B::Raster>>,
    widths: WidthList,
    variants: Option<VariantSet>,
    markup: Option<String>,
}

/// Uppercase format label: sniffed format, else the file extension, else `IMAGE`.
fn format_label(sniffed: Option<String>, filename: &str) -> String {
    sniffed
        .filter(|f| !f.is_empty())
        .map(|f| f.to_uppercase())
        .unwrap_or_else(|| {
            let ext = naming::extension(filename);
            if ext.is_empty() {
                "IMAGE".to_string()
            } else {
                ext.to_uppercase()
            }
        })
}

/// Build the markup for a finished set.
fn markup_for(
    variants: &VariantSet,
    base_name: &str,
    request: &MarkupRequest,
    config: &MarkupConfig,
) -> Result<ImgMarkup, SessionError> {
    build_markup(variants, base_name, request, config).ok_or(SessionError::NoVariants)
}

impl<B: ImageBackend> Session<B> {
    /// Start a session. `quality` is fixed for the session's lifetime.
    pub fn new(backend: B, quality: Quality, markup_config: MarkupConfig) -> Self {
        Self {
            backend,
            quality,
            markup_config,
            source: None,
            widths: WidthList::new(),
            variants: None,
            markup: None,
        }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref().map(|s| &s.image)
    }

    pub fn widths(&self) -> &[u32] {
        self.widths.widths()
    }

    pub fn widths_mut(&mut self) -> &mut WidthList {
        &mut self.widths
    }

    pub fn variants(&self) -> Option<&VariantSet> {
        self.variants.as_ref()
    }

    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Decode an upload and make it the current source.
    ///
    /// Replaces any previous source and results, and plans widths from the
    /// new source width. On decode failure the session is left empty.
    pub fn load(&mut self, upload: Upload) -> Result<&SourceImage, SessionError> {
        self.clear();

        let decoded = self
            .backend
            .decode(&upload.bytes)
            .map_err(|source| SessionError::Decode {
                name: upload.name.clone(),
                source,
            })?;

        let image = SourceImage {
            width: decoded.dimensions.width,
            height: decoded.dimensions.height,
            format: format_label(decoded.format, &upload.name),
            display_name: upload.name,
            original_bytes: upload.bytes,
        };
        log::info!(
            "loaded {} ({}x{}, {} bytes, {})",
            image.display_name,
            image.width,
            image.height,
            image.byte_size(),
            image.format
        );

        self.widths.set_auto(&planner::from_original(image.width));
        let loaded = self.source.insert(Loaded {
            image,
            raster: decoded.raster,
        });
        Ok(&loaded.image)
    }

    /// Drop the source, the width plan and all results.
    pub fn clear(&mut self) {
        self.source = None;
        self.widths.clear();
        self.variants = None;
        self.markup = None;
    }

    /// Re-plan widths from the source width.
    pub fn auto_from_original(&mut self) -> Result<&[u32], SessionError> {
        let width = self.source().ok_or(SessionError::NoSource)?.width;
        self.widths.set_auto(&planner::from_original(width));
        Ok(self.widths.widths())
    }

    /// Re-plan widths around a rendered width. An empty plan leaves the
    /// current list untouched; returns whether the list changed.
    pub fn auto_from_rendered(&mut self, rendered_width: u32) -> Result<bool, SessionError> {
        let width = self.source().ok_or(SessionError::NoSource)?.width;
        let plan = planner::from_rendered(rendered_width, width);
        if plan.is_empty() {
            return Ok(false);
        }
        self.widths.set_auto(&plan);
        Ok(true)
    }

    /// Restore the last automatic plan (or plan from the source if none).
    pub fn reset_widths(&mut self) {
        let width = self.source().map(|s| s.width);
        self.widths.reset(width);
    }

    /// Run the full pipeline for the current source and width plan.
    pub fn generate(
        &mut self,
        request: &MarkupRequest,
        events: Option<Sender<GenerateEvent>>,
    ) -> Result<GenerationReport, SessionError> {
        let loaded = self.source.as_ref().ok_or(SessionError::NoSource)?;
        let source = &loaded.image;

        self.variants = None;
        self.markup = None;

        let emit = |event: GenerateEvent| {
            if let Some(tx) = &events {
                // A dropped receiver only means nobody is watching
                let _ = tx.send(event);
            }
        };

        let widths = calculate_generation_widths(self.widths.widths(), source.width);
        let total = widths.len();
        emit(GenerateEvent::Started { total });

        let mut generated = Vec::with_capacity(total);
        let mut diagnostics = Vec::new();

        for (i, &width) in widths.iter().enumerate() {
            emit(GenerateEvent::Processing {
                width,
                index: i + 1,
                total,
            });

            match create_variant(&self.backend, &loaded.raster, source, width, self.quality) {
                Ok(variant) => {
                    log::debug!("encoded {} ({} bytes)", variant.filename, variant.byte_size());
                    emit(GenerateEvent::Encoded {
                        width,
                        filename: variant.filename.clone(),
                        byte_size: variant.byte_size(),
                    });
                    generated.push(variant);
                }
                Err(e) => {
                    log::warn!("skipping {}px: {}", width, e);
                    let message = e.to_string();
                    emit(GenerateEvent::Skipped {
                        width,
                        message: message.clone(),
                    });
                    diagnostics.push(EncodeFailure { width, message });
                }
            }
        }

        let variants = VariantSet::assemble(generated, original_variant(source));
        let markup = markup_for(&variants, source.base_name(), request, &self.markup_config)?;

        log::info!(
            "generated {} variants for {} ({} bytes total)",
            variants.len(),
            source.display_name,
            variants.total_bytes()
        );
        emit(GenerateEvent::Finished {
            count: variants.len(),
            total_bytes: variants.total_bytes(),
        });

        self.variants = Some(variants.clone());
        self.markup = Some(markup.html.clone());

        Ok(GenerationReport {
            variants,
            markup,
            attempted: widths,
            diagnostics,
        })
    }
}
