//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Source
//!
//! ```text
//! Source
//!     File:       hero.jpg
//!     Dimensions: 1600 × 1067
//!     Size:       412.37 KB
//!     Type:       JPEG
//! ```
//!
//! ## Plan
//!
//! ```text
//! Widths (from original): 400, 800, 1200, 1600
//! ```
//!
//! ## Generate
//!
//! ```text
//! Generating 4 widths
//!     [1/4] 400px
//!         hero-400.avif (18.20 KB)
//!     [2/4] 800px
//!         skipped: Encoding failed: ...
//! 4 images generated · Total size: 512.04 KB
//!     hero-400.avif   400 × 267   18.20 KB
//!     hero.jpg       1600 × 1067 412.37 KB (original)
//! ```
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::session::{GenerateEvent, GenerationReport};
use crate::types::SourceImage;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Byte count as kilobytes with two decimals.
pub fn format_kb(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Comma-separated width list, or `(none)`.
fn join_widths(widths: &[u32]) -> String {
    if widths.is_empty() {
        "(none)".to_string()
    } else {
        widths
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Source
// ============================================================================

/// Format the source info table.
pub fn format_source_info(source: &SourceImage) -> Vec<String> {
    vec![
        "Source".to_string(),
        format!("{}File:       {}", indent(1), source.display_name),
        format!(
            "{}Dimensions: {} \u{00d7} {}",
            indent(1),
            source.width,
            source.height
        ),
        format!("{}Size:       {}", indent(1), format_kb(source.byte_size())),
        format!("{}Type:       {}", indent(1), source.format),
    ]
}

pub fn print_source_info(source: &SourceImage) {
    for line in format_source_info(source) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format one labelled width plan.
pub fn format_widths(label: &str, widths: &[u32]) -> Vec<String> {
    vec![format!("Widths ({}): {}", label, join_widths(widths))]
}

pub fn print_widths(label: &str, widths: &[u32]) {
    for line in format_widths(label, widths) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format a single generation progress event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::Started { total } => {
            let noun = if *total == 1 { "width" } else { "widths" };
            vec![format!("Generating {} {}", total, noun)]
        }
        GenerateEvent::Processing {
            width,
            index,
            total,
        } => vec![format!("{}[{}/{}] {}px", indent(1), index, total, width)],
        GenerateEvent::Encoded {
            filename,
            byte_size,
            ..
        } => vec![format!(
            "{}{} ({})",
            indent(2),
            filename,
            format_kb(*byte_size)
        )],
        GenerateEvent::Skipped { message, .. } => {
            vec![format!("{}skipped: {}", indent(2), message)]
        }
        // The summary line comes from `format_results`
        GenerateEvent::Finished { .. } => Vec::new(),
    }
}

/// Format the results summary: count and total size, then one line per variant.
pub fn format_results(report: &GenerationReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} images generated \u{00b7} Total size: {}",
        report.variants.len(),
        format_kb(report.total_bytes())
    )];

    let name_width = report
        .variants
        .variants()
        .iter()
        .map(|v| v.filename.chars().count())
        .max()
        .unwrap_or(0);

    for v in &report.variants {
        let marker = if v.is_original { " (original)" } else { "" };
        lines.push(format!(
            "{}{:<name_width$}  {:>5} \u{00d7} {:<5} {:>12}{}",
            indent(1),
            v.filename,
            v.width,
            v.height,
            format_kb(v.byte_size()),
            marker,
        ));
    }

    for failure in &report.diagnostics {
        lines.push(format!(
            "{}{}px skipped: {}",
            indent(1),
            failure.width,
            failure.message
        ));
    }

    lines
}

pub fn print_results(report: &GenerationReport) {
    for line in format_results(report) {
        println!("{}", line);
    }
}

/// Format the markup block with a blank line on either side.
pub fn format_markup(html: &str) -> Vec<String> {
    let mut lines = vec![String::new()];
    lines.extend(html.lines().map(str::to_string));
    lines.push(String::new());
    lines
}

pub fn print_markup(html: &str) {
    for line in format_markup(html) {
        println!("{}", line);
    }
}

/// Format the closing export lines.
pub fn format_export(package_path: Option<&Path>, copied: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(path) = package_path {
        lines.push(format!("Package \u{2192} {}", path.display()));
    }
    if copied {
        lines.push("Markup copied to clipboard".to_string());
    }
    lines
}

pub fn print_export(package_path: Option<&Path>, copied: bool) {
    for line in format_export(package_path, copied) {
        println!("{}", line);
    }
}
