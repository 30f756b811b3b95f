//! Target width planning.
//!
//! Two deterministic planners turn a source width (and optionally the width
//! the image is expected to render at) into an ascending, duplicate-free list
//! of widths to generate:
//!
//! | Planner | Candidates |
//! |---|---|
//! | [`from_original`] | `{0.5, 0.8, 1.0} × W` when `W ≤ 420`, else `{0.25, 0.5, 0.75, 1.0} × W` |
//! | [`from_rendered`] | `0.6 × R`, `R` (both nice-rounded), `O`, and `R` itself when `R ≤ O` |
//!
//! Every candidate is clamped to `[160, original]` and the original width is
//! always part of the [`from_original`] plan.
//!
//! ## Nice rounding
//!
//! Computed widths are rounded to clean increments so the numbers read well in
//! filenames and markup:
//!
//! ```text
//!   value < 500        → nearest 10
//!   500 ≤ value < 900  → nearest 25
//!   value ≥ 900        → nearest 50
//! ```
//!
//! [`WidthList`] is the editable list a caller works with between planning
//! and generation: manual additions and removals, plus a "reset" back to the
//! last automatic plan.

use std::collections::BTreeSet;

/// Smallest width any planner will propose.
pub const MIN_WIDTH: u32 = 160;

/// Sources at or below this width use the short ratio ladder.
const SMALL_SOURCE_MAX: u32 = 420;

const SMALL_RATIOS: [f64; 3] = [0.5, 0.8, 1.0];
const LARGE_RATIOS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Fraction of the rendered width used for the low-density candidate.
const RENDERED_LOW_RATIO: f64 = 0.6;

/// Round a computed width to a clean increment (10 / 25 / 50 by magnitude).
pub fn nice_round(value: f64) -> u32 {
    let step = if value < 500.0 {
        10.0
    } else if value < 900.0 {
        25.0
    } else {
        50.0
    };
    ((value / step).round() * step).max(0.0) as u32
}

/// Clamp into `[MIN_WIDTH, original]`.
///
/// For sources narrower than [`MIN_WIDTH`] the upper bound wins, so no
/// planned width ever exceeds the source.
fn clamp_width(width: u32, original: u32) -> u32 {
    width.max(MIN_WIDTH).min(original)
}

/// Shared dedup/sort primitive: keep positive values, dedupe, sort ascending.
pub fn normalize_widths<I>(widths: I) -> Vec<u32>
where
    I: IntoIterator<Item = i64>,
{
    widths
        .into_iter()
        .filter(|&w| w > 0)
        .filter_map(|w| u32::try_from(w).ok())
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

/// Lenient integer parsing for user-entered widths.
///
/// Leading whitespace and an optional sign are accepted, then as many digits
/// as follow; trailing text is ignored (`"800px"` → 800). Returns `None`
/// unless the result is a positive width.
pub fn parse_width(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: u32 = rest[..digits_end].parse().ok()?;
    (!negative && value > 0).then_some(value)
}

/// Plan widths from the source width alone.
///
/// Returns an empty plan only for a zero width.
pub fn from_original(original_width: u32) -> Vec<u32> {
    if original_width == 0 {
        return Vec::new();
    }

    let ratios: &[f64] = if original_width <= SMALL_SOURCE_MAX {
        &SMALL_RATIOS
    } else {
        &LARGE_RATIOS
    };

    let candidates = ratios
        .iter()
        .map(|r| nice_round(original_width as f64 * r))
        .map(|w| clamp_width(w, original_width))
        .filter(|&w| w <= original_width)
        .chain(std::iter::once(original_width));

    normalize_widths(candidates.map(i64::from))
}

/// Plan widths around the width the image will actually render at.
///
/// Returns an empty plan when either width is zero.
pub fn from_rendered(rendered_width: u32, original_width: u32) -> Vec<u32> {
    if rendered_width == 0 || original_width == 0 {
        return Vec::new();
    }

    let mut candidates = vec![
        nice_round(rendered_width as f64 * RENDERED_LOW_RATIO),
        nice_round(rendered_width as f64),
        original_width,
    ];
    if rendered_width <= original_width {
        candidates.push(rendered_width);
    }

    normalize_widths(
        candidates
            .into_iter()
            .map(|w| i64::from(clamp_width(w, original_width))),
    )
}

/// Caller-editable list of target widths.
///
/// Always kept normalized (ascending, unique, positive). Remembers the last
/// automatic plan so manual edits can be undone with [`WidthList::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthList {
    widths: Vec<u32>,
    last_auto: Vec<u32>,
}

impl WidthList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Replace the list with an automatic plan and remember it.
    pub fn set_auto(&mut self, widths: &[u32]) {
        self.widths = normalize_widths(widths.iter().copied().map(i64::from));
        self.last_auto = self.widths.clone();
    }

    /// Add a width by hand. Returns `false` if zero or already present.
    pub fn add(&mut self, width: u32) -> bool {
        if width == 0 || self.widths.contains(&width) {
            return false;
        }
        self.widths.push(width);
        self.widths.sort_unstable();
        true
    }

    /// Parse and add user-entered text (see [`parse_width`]).
    pub fn add_str(&mut self, text: &str) -> bool {
        parse_width(text).is_some_and(|w| self.add(w))
    }

    pub fn remove(&mut self, width: u32) -> bool {
        let before = self.widths.len();
        self.widths.retain(|&w| w != width);
        self.widths.len() != before
    }

    /// Restore the last automatic plan, or re-plan from the source width when
    /// there is none yet.
    pub fn reset(&mut self, original_width: Option<u32>) {
        if !self.last_auto.is_empty() {
            self.widths = self.last_auto.clone();
        } else if let Some(width) = original_width {
            self.set_auto(&from_original(width));
        }
    }

    pub fn clear(&mut self) {
        self.widths.clear();
        self.last_auto.clear();
    }
}
