// crates/regionmatch-core/src/traits.rs

/// String similarity used by the resolver to rank candidates.
///
/// Implementors receive two *normalized* strings and must return a score in
/// `[0, 1]`, where `1.0` means identical. Scoring must be deterministic and
/// free of side effects visible to the resolver, so one metric instance can
/// be shared by every worker thread.
///
/// # Examples
/// ```rust
/// use regionmatch_core::traits::Similarity;
///
/// struct Exact;
/// impl Similarity for Exact {
///     fn score(&self, a: &str, b: &str) -> f64 {
///         if a == b { 1.0 } else { 0.0 }
///     }
/// }
///
/// assert_eq!(Exact.score("mandya", "mandya"), 1.0);
/// ```
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

impl<S: Similarity + ?Sized> Similarity for &S {
    #[inline]
    fn score(&self, a: &str, b: &str) -> f64 {
        (**self).score(a, b)
    }
}

impl<S: Similarity + ?Sized> Similarity for std::sync::Arc<S> {
    #[inline]
    fn score(&self, a: &str, b: &str) -> f64 {
        (**self).score(a, b)
    }
}

/// Name-based helpers for anything exposing a normalized name.
///
/// Used by the store and the resolver to compare nodes without re-running
/// the normalizer.
pub trait NameMatch {
    /// The node's name after normalization.
    fn normalized_name(&self) -> &str;

    /// Exact equality on normalized form.
    #[inline]
    fn is_named(&self, normalized: &str) -> bool {
        self.normalized_name() == normalized
    }
}
