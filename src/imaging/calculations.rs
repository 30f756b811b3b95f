//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Width used when the planned width set is empty at generation time.
pub const FALLBACK_WIDTH: u32 = 400;

/// Calculate the height of a variant scaled to `target_width`.
///
/// The source aspect ratio carries over by direct scaling:
/// `round(target_width × source_height / source_width)`, halves rounding up,
/// never below 1px. Integer arithmetic keeps ties exact.
///
/// # Examples
/// ```
/// # use simple_srcset::imaging::calculate_variant_height;
/// // 1600x1067 scaled to 400 wide → 267 high
/// assert_eq!(calculate_variant_height(400, (1600, 1067)), 267);
/// ```
pub fn calculate_variant_height(target_width: u32, source: (u32, u32)) -> u32 {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return 0;
    }
    let (target, src_w, src_h) = (target_width as u64, src_w as u64, src_h as u64);
    let rounded = (2 * target * src_h + src_w) / (2 * src_w);
    (rounded as u32).max(1)
}

/// Restrict planned widths to what the source can supply.
///
/// Widths above the source width are dropped (no upscaling). If nothing is
/// left, a single fallback width of `min(400, source_width)` is used instead.
pub fn calculate_generation_widths(planned: &[u32], source_width: u32) -> Vec<u32> {
    let widths: Vec<u32> = planned
        .iter()
        .copied()
        .filter(|&w| w > 0 && w <= source_width)
        .collect();

    if widths.is_empty() {
        vec![FALLBACK_WIDTH.min(source_width)]
    } else {
        widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_variant_height tests
    // =========================================================================

    #[test]
    fn height_landscape() {
        // 2000x1500 → 1000 wide keeps 4:3
        assert_eq!(calculate_variant_height(1000, (2000, 1500)), 750);
    }

    #[test]
    fn height_portrait() {
        // 1500x2000 → 750 wide → 1000 high
        assert_eq!(calculate_variant_height(750, (1500, 2000)), 1000);
    }

    #[test]
    fn height_rounds_to_nearest() {
        // 300 * 2/3 = 200, 301 * 2/3 = 200.67 → 201
        assert_eq!(calculate_variant_height(300, (3, 2)), 200);
        assert_eq!(calculate_variant_height(301, (3, 2)), 201);
    }

    #[test]
    fn height_half_rounds_up() {
        // 800 * 1067/1600 = 533.5
        assert_eq!(calculate_variant_height(800, (1600, 1067)), 534);
    }

    #[test]
    fn height_never_collapses_to_zero() {
        // Extreme panorama: 10000x10 scaled to 160 wide would round to 0
        assert_eq!(calculate_variant_height(160, (10000, 10)), 1);
    }

    // =========================================================================
    // calculate_generation_widths tests
    // =========================================================================

    #[test]
    fn generation_drops_widths_above_source() {
        assert_eq!(
            calculate_generation_widths(&[400, 800, 1600], 1000),
            vec![400, 800]
        );
    }

    #[test]
    fn generation_empty_falls_back_to_400() {
        assert_eq!(calculate_generation_widths(&[], 1600), vec![400]);
    }

    #[test]
    fn generation_empty_small_source_falls_back_to_source_width() {
        assert_eq!(calculate_generation_widths(&[], 250), vec![250]);
    }

    #[test]
    fn generation_all_too_large_falls_back() {
        assert_eq!(calculate_generation_widths(&[2000, 3000], 1200), vec![400]);
    }
}
