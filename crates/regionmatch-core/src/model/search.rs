// crates/regionmatch-core/src/model/search.rs
use crate::common::{Level, StoreStats};
use crate::model::flat::{GazetteerNode, GazetteerStore, NodeIndex};

impl GazetteerStore {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Level shared by every root, `None` for an empty store.
    pub fn root_level(&self) -> Option<Level> {
        self.root_level
    }

    pub fn nodes(&self) -> &[GazetteerNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&GazetteerNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i as usize])
    }

    pub fn node_at(&self, index: NodeIndex) -> Option<&GazetteerNode> {
        self.nodes.get(index as usize)
    }

    pub fn parent_of(&self, node: &GazetteerNode) -> Option<&GazetteerNode> {
        node.parent.map(|p| &self.nodes[p as usize])
    }

    /// Roots at `level`. Empty unless `level` is the store's root level.
    pub fn roots_at(&self, level: Level) -> Vec<&GazetteerNode> {
        self.collect(self.candidates(None, level))
    }

    /// Children of `parent_id` at `level`. Empty for an unknown parent.
    pub fn children_of(&self, parent_id: &str, level: Level) -> Vec<&GazetteerNode> {
        match self.by_id.get(parent_id) {
            Some(&p) => self.collect(self.candidates(Some(p), level)),
            None => Vec::new(),
        }
    }

    /// Exact lookup on an already-normalized name.
    pub fn lookup(&self, parent: Option<NodeIndex>, normalized: &str) -> Option<&GazetteerNode> {
        // The key is an owned pair; a lookup allocates one short String.
        self.by_name
            .get(&(parent, normalized.to_string()))
            .map(|&i| &self.nodes[i as usize])
    }

    /// Ancestors of `id`, root first, not including the node itself.
    pub fn ancestors(&self, id: &str) -> Vec<&GazetteerNode> {
        let mut out = Vec::new();
        let mut cur = self.node(id).and_then(|n| self.parent_of(n));
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent_of(n);
        }
        out.reverse();
        out
    }

    /// Direct children of `id` at every level below it, shallower level first.
    pub fn direct_children(&self, id: &str) -> Vec<&GazetteerNode> {
        match self.by_id.get(id) {
            Some(&p) => self.collect(&self.child_indices(p)),
            None => Vec::new(),
        }
    }

    /// Every node below `id`, depth first in row order.
    pub fn descendants(&self, id: &str) -> Vec<&GazetteerNode> {
        let mut out = Vec::new();
        let Some(start) = self.node(id) else {
            return out;
        };
        let mut stack: Vec<NodeIndex> = self.child_indices(start.index);
        stack.reverse();
        while let Some(i) = stack.pop() {
            out.push(&self.nodes[i as usize]);
            stack.extend(self.child_indices(i).iter().rev());
        }
        out
    }

    /// Whether `parent` has any child at `level`.
    pub(crate) fn has_children_at(&self, parent: Option<NodeIndex>, level: Level) -> bool {
        !self.candidates(parent, level).is_empty()
    }

    fn child_indices(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let level = self.nodes[parent as usize].level;
        Level::ALL
            .iter()
            .filter(|&&l| level.accepts_child(l))
            .flat_map(|&l| self.candidates(Some(parent), l).iter().copied())
            .collect()
    }

    /// Candidate indices for one resolver step.
    pub(crate) fn candidates(&self, parent: Option<NodeIndex>, level: Level) -> &[NodeIndex] {
        self.children
            .get(&(parent, level))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn collect(&self, idx: &[NodeIndex]) -> Vec<&GazetteerNode> {
        idx.iter().map(|&i| &self.nodes[i as usize]).collect()
    }
}
