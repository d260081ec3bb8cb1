// crates/regionmatch-core/src/model/flat.rs
use crate::common::{Level, StoreStats};
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node inside its store's arena.
///
/// Only meaningful together with the store (and version) that produced it.
pub type NodeIndex = u32;

/// The gazetteer for one hierarchy version.
/// All nodes live in one contiguous vector; parents are referenced by index.
///
/// Immutable once built; a reload produces a new store.
#[derive(Clone, Debug)]
pub struct GazetteerStore {
    pub(crate) version: u64,
    /// Master list of all nodes, parents before children.
    pub(crate) nodes: Vec<GazetteerNode>,
    pub(crate) by_id: HashMap<String, NodeIndex>,
    /// (parent, normalized name) -> node. Roots use `None`.
    pub(crate) by_name: HashMap<(Option<NodeIndex>, String), NodeIndex>,
    /// (parent, level) -> children, in row order.
    pub(crate) children: HashMap<(Option<NodeIndex>, Level), Vec<NodeIndex>>,
    pub(crate) root_level: Option<Level>,
    pub(crate) stats: StoreStats,
}

/// One administrative unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerNode {
    pub index: NodeIndex,
    /// Stable code from the reference data, e.g. `district_572`.
    pub id: String,
    /// Canonical display name.
    pub name: String,
    pub normalized: String,
    pub level: Level,
    /// Id prefix naming the unit type, e.g. `subdistrict` or `ulb` for two
    /// nodes that both sit at [`Level::Subdistrict`].
    pub kind: String,
    /// Back-reference for lookups only; the store owns every node.
    pub parent: Option<NodeIndex>,
}

impl NameMatch for GazetteerNode {
    fn normalized_name(&self) -> &str {
        &self.normalized
    }
}
