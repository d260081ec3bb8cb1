// crates/regionmatch-core/src/model/convert.rs
use crate::common::{id_kind, StoreStats};
use crate::error::{GazetteerError, Result};
use crate::model::flat::{GazetteerNode, GazetteerStore, NodeIndex};
use crate::raw::ReferenceRow;
use crate::text::{Normalized, Normalizer};
use log::info;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Arena index for the node about to be pushed at position `len`.
fn next_index(len: usize, row_no: usize) -> Result<NodeIndex> {
    NodeIndex::try_from(len).map_err(|_| {
        GazetteerError::malformed(row_no, format!("more than {} nodes", NodeIndex::MAX))
    })
}

impl GazetteerStore {
    /// **Standard Converter:** Rows -> Store.
    ///
    /// Single pass over `rows`; a row may only reference a parent that
    /// appeared earlier. Every successful load gets a fresh version number,
    /// strictly greater than any version handed out before in this process.
    ///
    /// Fails with [`GazetteerError::MalformedGazetteer`] on:
    /// - a blank or duplicate id
    /// - a name that normalizes to nothing
    /// - a level that is neither given nor implied by the id prefix
    /// - a parent not yet seen, or a child not exactly one level below it
    ///   (two when the level in between is optional)
    /// - a root at a different level from the first root
    /// - two siblings with the same normalized name
    pub fn load<I>(rows: I, normalizer: &Normalizer) -> Result<Self>
    where
        I: IntoIterator<Item = ReferenceRow>,
    {
        let rows = rows.into_iter();
        let mut nodes: Vec<GazetteerNode> = Vec::with_capacity(rows.size_hint().0);
        let mut by_id: HashMap<String, NodeIndex> = HashMap::new();
        let mut by_name = HashMap::new();
        let mut children: HashMap<_, Vec<NodeIndex>> = HashMap::new();
        let mut root_level = None;
        let mut stats = StoreStats::default();

        for (i, row) in rows.enumerate() {
            let row_no = i + 1;
            let id = row.id.trim();
            if id.is_empty() {
                return Err(GazetteerError::malformed(row_no, "blank id"));
            }
            if by_id.contains_key(id) {
                return Err(GazetteerError::malformed(row_no, format!("duplicate id {id:?}")));
            }
            let level = row.resolved_level().ok_or_else(|| {
                GazetteerError::malformed(row_no, format!("cannot determine level of {id:?}"))
            })?;
            let normalized = match normalizer.normalize(&row.name) {
                Normalized::Text(s) => s,
                Normalized::Empty => {
                    return Err(GazetteerError::malformed(row_no, format!("{id:?} has no name")))
                }
            };

            let parent = match row.parent() {
                None => {
                    match root_level {
                        None => root_level = Some(level),
                        Some(rl) if rl != level => {
                            return Err(GazetteerError::malformed(
                                row_no,
                                format!("root {id:?} is a {level}, other roots are {rl}"),
                            ))
                        }
                        Some(_) => {}
                    }
                    None
                }
                Some(pid) => {
                    let p = *by_id.get(pid).ok_or_else(|| {
                        GazetteerError::malformed(
                            row_no,
                            format!("{id:?} references parent {pid:?} not yet seen"),
                        )
                    })?;
                    let parent_level = nodes[p as usize].level;
                    if !parent_level.accepts_child(level) {
                        return Err(GazetteerError::malformed(
                            row_no,
                            format!("{id:?} is a {level} but its parent {pid:?} is a {parent_level}"),
                        ));
                    }
                    Some(p)
                }
            };

            let index = next_index(nodes.len(), row_no)?;
            if by_name.insert((parent, normalized.clone()), index).is_some() {
                return Err(GazetteerError::malformed(
                    row_no,
                    format!("duplicate name {normalized:?} under the same parent"),
                ));
            }
            by_id.insert(id.to_string(), index);
            children.entry((parent, level)).or_default().push(index);
            stats.bump(level);

            nodes.push(GazetteerNode {
                index,
                id: id.to_string(),
                name: row.name.trim().to_string(),
                normalized,
                level,
                kind: id_kind(id, level),
                parent,
            });
        }

        let version = NEXT_VERSION.fetch_add(1, Ordering::SeqCst);
        stats.version = version;
        info!(
            "Loaded gazetteer version {} ({} nodes: {} states, {} districts, {} subdistricts, {} zones, {} villages)",
            version,
            nodes.len(),
            stats.states,
            stats.districts,
            stats.subdistricts,
            stats.zones,
            stats.villages
        );

        Ok(GazetteerStore {
            version,
            nodes,
            by_id,
            by_name,
            children,
            root_level,
            stats,
        })
    }

    /// Rebuilds the reference rows this store was loaded from (parents first).
    pub fn to_rows(&self) -> Vec<ReferenceRow> {
        self.nodes
            .iter()
            .map(|n| ReferenceRow {
                id: n.id.clone(),
                name: n.name.clone(),
                level: Some(n.level),
                parent_id: n.parent.map(|p| self.nodes[p as usize].id.clone()),
            })
            .collect()
    }
}
