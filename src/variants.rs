//! Variant set assembly.
//!
//! A generation run produces one [`Variant`] per width that encoded
//! successfully. The assembler adds the untouched original, sorts by width,
//! and collapses entries that share a width so each width appears once.
//!
//! When a generated variant lands on the same width as the original, the
//! original wins: its real filename and bytes are kept and the re-encoded
//! duplicate is dropped. Since generated filenames encode their width, the
//! one-per-width rule also makes filenames unique within the set.

use crate::types::Variant;

/// Variants ordered strictly ascending by width, at most one per width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    variants: Vec<Variant>,
}

impl VariantSet {
    /// Merge generated variants with the original.
    pub fn assemble(generated: Vec<Variant>, original: Variant) -> Self {
        let mut all = generated;
        all.push(original);
        Self::from_variants(all)
    }

    /// Sort by width and collapse equal widths, preferring the original.
    ///
    /// The sort is stable, so among equal non-original widths the first one
    /// encountered survives.
    pub fn from_variants(mut variants: Vec<Variant>) -> Self {
        variants.sort_by_key(|v| v.width);

        let mut merged: Vec<Variant> = Vec::with_capacity(variants.len());
        for variant in variants {
            match merged.last_mut() {
                Some(prev) if prev.width == variant.width => {
                    if variant.is_original && !prev.is_original {
                        *prev = variant;
                    }
                }
                _ => merged.push(variant),
            }
        }

        Self { variants: merged }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn widths(&self) -> Vec<u32> {
        self.variants.iter().map(|v| v.width).collect()
    }

    /// Largest variant (last in ascending order).
    pub fn largest(&self) -> Option<&Variant> {
        self.variants.last()
    }

    /// Sum of every surviving variant's byte size.
    pub fn total_bytes(&self) -> usize {
        self.variants.iter().map(Variant::byte_size).sum()
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{generated, original};
    use proptest::prelude::*;

    #[test]
    fn assemble_appends_original_and_sorts() {
        let set = VariantSet::assemble(
            vec![generated(800, 10), generated(400, 5), generated(1200, 20)],
            original("hero.jpg", 1600, 99),
        );

        assert_eq!(set.widths(), vec![400, 800, 1200, 1600]);
        assert!(set.largest().unwrap().is_original);
        assert_eq!(set.total_bytes(), 5 + 10 + 20 + 99);
    }

    #[test]
    fn assemble_prefers_original_on_equal_width() {
        let set = VariantSet::assemble(
            vec![generated(400, 5), generated(800, 10)],
            original("hero.jpg", 800, 77),
        );

        assert_eq!(set.widths(), vec![400, 800]);
        let top = set.largest().unwrap();
        assert!(top.is_original);
        assert_eq!(top.filename, "hero.jpg");
        assert_eq!(top.byte_size(), 77);
        assert_eq!(set.total_bytes(), 5 + 77);
    }

    #[test]
    fn original_wins_regardless_of_input_order() {
        let set = VariantSet::from_variants(vec![
            original("a.png", 500, 1),
            generated(500, 2),
        ]);
        assert_eq!(set.len(), 1);
        assert!(set.variants()[0].is_original);
    }

    #[test]
    fn equal_generated_widths_keep_first() {
        let mut first = generated(300, 3);
        first.bytes = vec![1; 3];
        let set = VariantSet::from_variants(vec![first.clone(), generated(300, 8)]);
        assert_eq!(set.variants(), &[first]);
    }

    #[test]
    fn only_original() {
        let set = VariantSet::assemble(Vec::new(), original("tiny.gif", 120, 4));
        assert_eq!(set.len(), 1);
        assert_eq!(set.total_bytes(), 4);
    }

    #[test]
    fn filenames_unique_after_merge() {
        let set = VariantSet::assemble(
            vec![generated(160, 1), generated(240, 1), generated(300, 1)],
            original("small.png", 300, 1),
        );
        let mut names: Vec<&str> = set.into_iter().map(|v| v.filename.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), set.len());
    }

    proptest! {
        #[test]
        fn prop_strictly_ascending_and_original_survives(
            widths in proptest::collection::vec(1u32..3000, 0..12),
            original_width in 1u32..3000,
        ) {
            let set = VariantSet::assemble(
                widths.iter().map(|&w| generated(w, 1)).collect(),
                original("src.jpg", original_width, 1),
            );
            prop_assert!(set.widths().windows(2).all(|w| w[0] < w[1]));
            let at_original: Vec<_> = set
                .into_iter()
                .filter(|v| v.width == original_width)
                .collect();
            prop_assert_eq!(at_original.len(), 1);
            prop_assert!(at_original[0].is_original);
        }
    }
}
