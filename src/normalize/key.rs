//! Soft-link clustering key
//!
//! The broadest normalization in the crate: used only to group free-text
//! active-principle declarations, never for display. "A + B" and "B + A"
//! produce the same key; a cream and a tablet of the same molecule do not.

use super::{normalize, NormalizeOptions};

/// Clustering key of a substance or combination string.
///
/// Order-invariant for combination products: tokens are sorted after salt,
/// dosage, and form stripping.
pub fn clustering_key(name: &str) -> String {
    normalize(name, &NormalizeOptions::clustering())
}
