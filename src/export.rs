//! Hand-off of a finished generation run.
//!
//! Two independent actions, each terminal to itself only:
//!
//! - [`package`] writes one self-contained archive next to the other outputs:
//!
//! ```text
//! dist/hero-responsive.zip
//! ├── hero-400.avif
//! ├── hero-800.avif
//! ├── hero-1200.avif
//! ├── hero.jpg          # the untouched original
//! ├── manifest.json     # sizes, checksums, the markup
//! └── index.html        # preview page
//! ```
//!
//! - [`copy_to_clipboard`] puts the exact markup string on the system
//!   clipboard.
//!
//! Entry names are reduced to their final path component, so an upload named
//! `../../x.jpg` is stored as `x.jpg`. Variants own their names: when one
//! already uses `manifest.json` or `index.html`, the metadata entry moves to
//! an underscore-prefixed name instead.

use crate::markup::ImgMarkup;
use crate::naming;
use crate::output::format_kb;
use crate::session::GenerationReport;
use crate::types::{SourceImage, Variant};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// `manifest.json` at the root of a package.
#[derive(Debug, Serialize)]
pub struct PackageManifest {
    pub source: SourceEntry,
    pub variants: Vec<VariantEntry>,
    pub markup: String,
    pub total_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct SourceEntry {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub byte_size: usize,
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct VariantEntry {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub byte_size: usize,
    pub sha256: String,
    pub is_original: bool,
}

/// Final path component of `name`, or a width-derived name when there is none.
pub fn safe_filename(name: &str, width: u32) -> String {
    Path::new(name)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| format!("variant-{}", width))
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn variant_entry(variant: &Variant) -> VariantEntry {
    VariantEntry {
        filename: safe_filename(&variant.filename, variant.width),
        width: variant.width,
        height: variant.height,
        byte_size: variant.byte_size(),
        sha256: sha256_hex(&variant.bytes),
        is_original: variant.is_original,
    }
}

/// Build the manifest describing a report.
pub fn build_manifest(report: &GenerationReport, source: &SourceImage) -> PackageManifest {
    PackageManifest {
        source: SourceEntry {
            filename: safe_filename(&source.display_name, source.width),
            width: source.width,
            height: source.height,
            byte_size: source.byte_size(),
            format: source.format.clone(),
        },
        variants: report.variants.variants().iter().map(variant_entry).collect(),
        markup: report.markup.html.clone(),
        total_bytes: report.total_bytes(),
    }
}

/// Preferred name of the manifest entry.
pub const MANIFEST_NAME: &str = "manifest.json";
/// Preferred name of the preview page entry.
pub const PREVIEW_NAME: &str = "index.html";

/// `preferred`, or the first of `_preferred`, `__preferred`, ... not yet taken.
fn reserve_name(preferred: &str, taken: &HashSet<String>) -> String {
    let mut name = preferred.to_string();
    while taken.contains(&name) {
        name.insert(0, '_');
    }
    name
}

/// Write `report` into `<out_dir>/<basename>-responsive.zip` and return that path.
///
/// An existing archive of the same name is replaced.
pub fn package(
    report: &GenerationReport,
    source: &SourceImage,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let source_name = safe_filename(&source.display_name, source.width);
    let path = out_dir.join(naming::archive_name(naming::base_name(&source_name)));
    fs::create_dir_all(out_dir)?;

    let manifest = build_manifest(report, source);
    let mut taken: HashSet<String> = manifest
        .variants
        .iter()
        .map(|v| v.filename.clone())
        .collect();
    let manifest_name = reserve_name(MANIFEST_NAME, &taken);
    taken.insert(manifest_name.clone());
    let preview_name = reserve_name(PREVIEW_NAME, &taken);

    // Images are already compressed; only the text entries are deflated
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut writer = ZipWriter::new(File::create(&path)?);
    for (variant, entry) in report.variants.variants().iter().zip(&manifest.variants) {
        writer.start_file(entry.filename.as_str(), stored)?;
        writer.write_all(&variant.bytes)?;
        log::debug!("stored {}", entry.filename);
    }

    writer.start_file(manifest_name.as_str(), deflated)?;
    writer.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;
    writer.start_file(preview_name.as_str(), deflated)?;
    writer.write_all(render_preview(&manifest, &report.markup).into_string().as_bytes())?;
    writer.finish()?;

    log::info!(
        "packaged {} variants into {}",
        manifest.variants.len(),
        path.display()
    );
    Ok(path)
}

/// Put `markup` on the system clipboard, byte for byte.
pub fn copy_to_clipboard(markup: &str) -> Result<(), ExportError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(markup.to_string())
        .map_err(|e| ExportError::Clipboard(e.to_string()))?;
    Ok(())
}

// ============================================================================
// Preview page
// ============================================================================

const PREVIEW_CSS: &str = "\
body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#222}\
table{border-collapse:collapse;width:100%;margin:1rem 0}\
th,td{text-align:left;padding:.25rem .5rem;border-bottom:1px solid #ddd}\
td.num{text-align:right;font-variant-numeric:tabular-nums}\
figure{margin:1rem 0}\
figure img{max-width:100%;height:auto}\
pre{background:#f4f4f4;padding:1rem;overflow-x:auto}";

/// The preview page. The live image uses package-relative paths so it
/// renders straight from disk; the code block shows the markup as copied.
fn render_preview(manifest: &PackageManifest, markup: &ImgMarkup) -> Markup {
    let local_src = safe_filename(&markup.fallback, markup.width);
    let local_srcset = manifest
        .variants
        .iter()
        .map(|v| format!("{} {}w", v.filename, v.width))
        .collect::<Vec<_>>()
        .join(", ");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (manifest.source.filename) " responsive variants" }
                style { (PreEscaped(PREVIEW_CSS)) }
            }
            body {
                h1 { (manifest.source.filename) }
                p {
                    (manifest.source.width) "×" (manifest.source.height) " · "
                    (manifest.source.format) " · " (format_kb(manifest.source.byte_size))
                }
                table {
                    thead {
                        tr { th { "File" } th { "Width" } th { "Height" } th { "Size" } th { "" } }
                    }
                    tbody {
                        @for v in &manifest.variants {
                            tr {
                                td { a href=(v.filename) { (v.filename) } }
                                td.num { (v.width) }
                                td.num { (v.height) }
                                td.num { (format_kb(v.byte_size)) }
                                td { @if v.is_original { "original" } }
                            }
                        }
                    }
                }
                p { "Total: " (format_kb(manifest.total_bytes)) }
                figure {
                    img src=(local_src) srcset=(local_srcset) sizes=(markup.sizes)
                        width=(markup.width) height=(markup.height) alt=(markup.alt);
                }
                h2 { "Markup" }
                pre { code { (manifest.markup) } }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkupConfig;
    use crate::markup::{MarkupRequest, build_markup};
    use crate::test_helpers::{generated, original, source_image, zip_entries};
    use crate::variants::VariantSet;

    fn report_for(source: &SourceImage) -> GenerationReport {
        let mut gen_400 = generated(400, 10);
        gen_400.filename = naming::variant_filename(source.base_name(), 400);
        let set = VariantSet::assemble(
            vec![gen_400],
            Variant {
                bytes: source.original_bytes.clone(),
                ..original(&source.display_name, source.width, 0)
            },
        );
        let markup = build_markup(
            &set,
            source.base_name(),
            &MarkupRequest::default(),
            &MarkupConfig::default(),
        )
        .unwrap();
        GenerationReport {
            variants: set,
            markup,
            attempted: vec![400, source.width],
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn safe_filename_strips_directories() {
        assert_eq!(safe_filename("hero.jpg", 1), "hero.jpg");
        assert_eq!(safe_filename("../../etc/hero.jpg", 1), "hero.jpg");
        assert_eq!(safe_filename("a/b/c-400.avif", 400), "c-400.avif");
        assert_eq!(safe_filename("..", 800), "variant-800");
        assert_eq!(safe_filename("", 800), "variant-800");
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn reserve_name_prefixes_until_free() {
        let mut taken = HashSet::new();
        assert_eq!(reserve_name("index.html", &taken), "index.html");
        taken.insert("index.html".to_string());
        taken.insert("_index.html".to_string());
        assert_eq!(reserve_name("index.html", &taken), "__index.html");
    }

    #[test]
    fn package_writes_every_variant_and_metadata() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = source_image("hero.jpg", 800, 600);
        let report = report_for(&source);

        let path = package(&report, &source, tmp.path()).unwrap();

        assert_eq!(path, tmp.path().join("hero-responsive.zip"));
        let entries = zip_entries(&path);
        let names: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["hero-400.avif", "hero.jpg", "index.html", "manifest.json"]
        );
        assert_eq!(entries["hero-400.avif"], vec![0u8; 10]);
        assert_eq!(entries["hero.jpg"], source.original_bytes);
        assert!(entries["index.html"].starts_with(b"<!DOCTYPE html>"));

        let json: serde_json::Value = serde_json::from_slice(&entries["manifest.json"]).unwrap();
        assert_eq!(json["source"]["width"], 800);
        assert_eq!(json["source"]["format"], "PNG");
        assert_eq!(json["variants"].as_array().unwrap().len(), 2);
        assert_eq!(json["variants"][1]["is_original"], true);
        assert_eq!(
            json["variants"][0]["sha256"],
            sha256_hex(&[0; 10]).as_str()
        );
        assert_eq!(json["markup"], report.markup.html.as_str());
        assert_eq!(json["total_bytes"], 10 + 64);
    }

    #[test]
    fn package_replaces_existing_archive() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = source_image("hero.jpg", 800, 600);
        fs::write(tmp.path().join("hero-responsive.zip"), b"stale").unwrap();

        let path = package(&report_for(&source), &source, tmp.path()).unwrap();
        assert_eq!(zip_entries(&path).len(), 4);
    }

    #[test]
    fn package_confines_traversal_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let source = source_image("../escape.png", 600, 400);
        let report = report_for(&source);

        let path = package(&report, &source, &out).unwrap();

        assert_eq!(path, out.join("escape-responsive.zip"));
        let entries = zip_entries(&path);
        assert!(entries.contains_key("escape.png"));
        assert!(entries.contains_key("escape-400.avif"));
        assert!(entries.keys().all(|name| !name.contains('/')));
    }

    #[test]
    fn upload_named_like_metadata_keeps_its_bytes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = source_image("index.html", 800, 600);
        let report = report_for(&source);

        let path = package(&report, &source, tmp.path()).unwrap();

        assert_eq!(path, tmp.path().join("index-responsive.zip"));
        let entries = zip_entries(&path);
        assert_eq!(entries["index.html"], source.original_bytes);
        assert!(entries["_index.html"].starts_with(b"<!DOCTYPE html>"));
        assert!(entries.contains_key("manifest.json"));
    }

    #[test]
    fn upload_named_manifest_moves_manifest_entry() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = source_image("manifest.json", 800, 600);

        let path = package(&report_for(&source), &source, tmp.path()).unwrap();

        let entries = zip_entries(&path);
        assert_eq!(entries["manifest.json"], source.original_bytes);
        let json: serde_json::Value = serde_json::from_slice(&entries["_manifest.json"]).unwrap();
        assert_eq!(json["source"]["filename"], "manifest.json");
        assert!(entries.contains_key("index.html"));
    }

    #[test]
    fn package_into_unwritable_location_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, b"not a dir").unwrap();
        let source = source_image("hero.jpg", 800, 600);

        let result = package(&report_for(&source), &source, &blocker);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn preview_page_shows_table_and_markup() {
        let source = source_image("hero.jpg", 800, 600);
        let report = report_for(&source);
        let manifest = build_manifest(&report, &source);

        let html = render_preview(&manifest, &report.markup).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<a href=\"hero-400.avif\">hero-400.avif</a>"));
        assert!(html.contains("srcset=\"hero-400.avif 400w, hero.jpg 800w\""));
        // Markup is shown escaped inside the code block
        assert!(html.contains("&lt;img\n src=&quot;/images/hero.jpg&quot;"));
    }
}
