//! Core data types shared by the planner, rasterizer, assembler and markup
//! builder.
//!
//! Both types are immutable once built. A [`SourceImage`] lives as long as
//! the session keeps it loaded; [`Variant`]s live until the next generation
//! run or a new upload replaces them.

/// The uploaded image as the rest of the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    /// The upload, byte for byte. Becomes the original variant's payload.
    pub original_bytes: Vec<u8>,
    /// Upload filename as given (`dawn.jpg`).
    pub display_name: String,
    /// Uppercase format label (`JPEG`, `PNG`, ... or `IMAGE` when unknown).
    pub format: String,
}

impl SourceImage {
    pub fn byte_size(&self) -> usize {
        self.original_bytes.len()
    }

    /// Filename without extension, used to name generated variants.
    pub fn base_name(&self) -> &str {
        crate::naming::base_name(&self.display_name)
    }
}

/// One re-encoded (or original) copy of the source at a specific width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
    /// `true` only for the untouched upload.
    pub is_original: bool,
}

impl Variant {
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}
