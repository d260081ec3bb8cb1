// crates/regionmatch-core/src/matcher.rs
use crate::traits::Similarity;

/// Default length-screen ratio: candidates whose length differs from the
/// query by more than half of the longer string score 0 without computing
/// a distance.
pub const DEFAULT_MAX_LENGTH_RATIO: f64 = 0.5;

/// Normalized Levenshtein similarity: `1 - distance / max_len`.
///
/// Because the edit distance is at least the length difference, a pair that
/// fails the length screen can never score above `1 - max_length_ratio`.
/// As long as every acceptance threshold is at or above that bound (checked
/// by [`crate::ResolverConfig::validate`]), screening never changes which
/// candidate is accepted.
#[derive(Clone, Copy, Debug)]
pub struct Levenshtein {
    max_length_ratio: f64,
}

impl Levenshtein {
    pub fn new(max_length_ratio: f64) -> Self {
        Self {
            max_length_ratio: max_length_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn max_length_ratio(&self) -> f64 {
        self.max_length_ratio
    }
}

impl Default for Levenshtein {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH_RATIO)
    }
}

impl Similarity for Levenshtein {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let la = a.chars().count();
        let lb = b.chars().count();
        let max_len = la.max(lb);
        if max_len == 0 {
            return 1.0;
        }
        let diff = la.abs_diff(lb);
        if diff as f64 > self.max_length_ratio * max_len as f64 {
            return 0.0;
        }
        let distance = strsim::levenshtein(a, b);
        1.0 - distance as f64 / max_len as f64
    }
}
