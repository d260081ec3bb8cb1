// crates/regionmatch-core/src/model/mod.rs
pub mod convert;
pub mod flat;
pub mod search;

pub use flat::{GazetteerNode, GazetteerStore, NodeIndex};

/// The file extension used for the binary snapshot of reference rows.
pub const CACHE_SUFFIX: &str = "rows.bin";
