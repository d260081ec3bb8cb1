// crates/regionmatch-core/src/lib.rs

//! # regionmatch-core
//!
//! Resolves free-text administrative unit names (district, taluk /
//! sub-district, village / ward) from epidemiological line-lists to the
//! canonical entries of a gazetteer.
//!
//! - [`GazetteerStore`]: immutable, indexed hierarchy for one version
//! - [`Normalizer`]: deterministic, idempotent text cleaning
//! - [`Levenshtein`]: normalized edit-distance similarity
//! - [`HierarchicalResolver`]: level-by-level matching with thresholds
//! - [`ResolutionCache`]: versioned LRU of results
//! - [`Standardiser`]: the thread-safe facade tying them together, with
//!   atomic gazetteer reload
//!
//! Unmatched input is returned as data (an unresolved level), never as an
//! error.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod common;
pub mod config;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod model;
#[doc(hidden)]
pub mod raw;
pub mod resolver;
pub mod standardiser;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::cache::{CacheKey, CacheStats, ResolutionCache};
pub use crate::common::{Level, StoreStats};
pub use crate::config::{LevelThresholds, ResolverConfig};
pub use crate::error::{GazetteerError, Result};
pub use crate::matcher::Levenshtein;
pub use crate::model::{GazetteerNode, GazetteerStore, NodeIndex};
pub use crate::raw::ReferenceRow;
pub use crate::resolver::{
    AuditEntry, Decision, HierarchicalResolver, LevelResolution, MatchCandidate,
    RawLocationInput, ResolutionResult,
};
pub use crate::standardiser::Standardiser;
pub use crate::text::{fold_key, Normalized, Normalizer};
pub use crate::traits::{NameMatch, Similarity};
