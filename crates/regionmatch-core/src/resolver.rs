// crates/regionmatch-core/src/resolver.rs

//! # Hierarchical resolution
//!
//! Matches a [`RawLocationInput`] against a [`GazetteerStore`] one level at a
//! time. A level is only attempted once its parent level was accepted, and
//! the search space at each level is the children of the node accepted
//! above it.

use crate::common::Level;
use crate::config::LevelThresholds;
use crate::error::{GazetteerError, Result};
use crate::model::{GazetteerNode, GazetteerStore, NodeIndex};
use crate::text::{Normalized, Normalizer};
use crate::traits::{NameMatch, Similarity};
use log::debug;
use serde::{Deserialize, Serialize};

/// Free-text location fields exactly as reported in one source record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLocationInput {
    pub state: Option<String>,
    pub district: Option<String>,
    #[serde(alias = "taluk", alias = "ulb")]
    pub subdistrict: Option<String>,
    pub zone: Option<String>,
    #[serde(alias = "ward")]
    pub village: Option<String>,
    /// Restricts subdistrict candidates to the given id prefixes, e.g.
    /// `subdistrict` for revenue units or `ulb` for urban bodies. Several
    /// kinds may be listed with commas.
    #[serde(alias = "childType", alias = "child_type")]
    pub subdistrict_kind: Option<String>,
}

impl RawLocationInput {
    pub fn new(
        district: impl Into<String>,
        subdistrict: impl Into<String>,
        village: impl Into<String>,
    ) -> Self {
        Self {
            state: None,
            district: Some(district.into()),
            subdistrict: Some(subdistrict.into()),
            zone: None,
            village: Some(village.into()),
            subdistrict_kind: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_subdistrict_kind(mut self, kind: impl Into<String>) -> Self {
        self.subdistrict_kind = Some(kind.into());
        self
    }

    /// Raw text for `level`; missing fields read as "".
    pub fn get(&self, level: Level) -> &str {
        let field = match level {
            Level::State => &self.state,
            Level::District => &self.district,
            Level::Subdistrict => &self.subdistrict,
            Level::Zone => &self.zone,
            Level::Village => &self.village,
        };
        field.as_deref().unwrap_or("")
    }

    /// Lowercased kinds allowed at `level`; empty means any kind.
    pub fn kinds(&self, level: Level) -> Vec<String> {
        match (level, self.subdistrict_kind.as_deref()) {
            (Level::Subdistrict, Some(list)) => list
                .split(',')
                .map(|k| k.trim().to_ascii_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A node paired with its similarity to the query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub index: NodeIndex,
    pub id: String,
    pub name: String,
    pub normalized: String,
    pub score: f64,
}

impl MatchCandidate {
    fn new(node: &GazetteerNode, score: f64) -> Self {
        Self {
            index: node.index,
            id: node.id.clone(),
            name: node.name.clone(),
            normalized: node.normalized.clone(),
            score,
        }
    }
}

/// What the resolver did at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accepted,
    /// The best candidate scored under the level's threshold.
    BelowThreshold,
    /// The raw text normalized to nothing.
    EmptyInput,
    /// The accepted parent has no children at this level, or none of the
    /// requested kind.
    NoCandidates,
    /// A shallower level was not accepted, so this one was not attempted.
    ParentUnresolved,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub raw: String,
    pub normalized: Normalized,
    pub best: Option<MatchCandidate>,
    /// Number of similarity computations; 0 on an exact index hit.
    pub candidates_scored: usize,
    pub threshold: f64,
    pub decision: Decision,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelResolution {
    pub level: Level,
    /// `Some` only when the decision is [`Decision::Accepted`].
    pub resolved: Option<MatchCandidate>,
    /// Running minimum of accepted scores down to this level; 0 when
    /// unresolved.
    pub confidence: f64,
    pub audit: AuditEntry,
}

impl LevelResolution {
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Outcome for one record.
///
/// Holds one [`LevelResolution`] per level from the start level (below
/// `anchor`, or the store's root level) down to [`Level::Village`].
/// [`Level::Zone`] is left out when the hierarchy has no zone under the
/// accepted subdistrict, or when descent stopped above it and no zone text
/// was given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub version: u64,
    /// Parent id the resolution started under, if one was given.
    pub anchor: Option<String>,
    pub levels: Vec<LevelResolution>,
    /// Minimum accepted score, 0 if no level was accepted.
    pub confidence: f64,
}

impl ResolutionResult {
    pub fn level(&self, level: Level) -> Option<&LevelResolution> {
        self.levels.iter().find(|l| l.level == level)
    }

    pub fn resolved(&self, level: Level) -> Option<&MatchCandidate> {
        self.level(level).and_then(|l| l.resolved.as_ref())
    }

    /// Deepest accepted node.
    pub fn deepest(&self) -> Option<&MatchCandidate> {
        self.levels.iter().rev().find_map(|l| l.resolved.as_ref())
    }

    pub fn is_fully_resolved(&self) -> bool {
        !self.levels.is_empty() && self.levels.iter().all(LevelResolution::is_resolved)
    }

    pub fn is_unresolved(&self) -> bool {
        self.levels.iter().all(|l| !l.is_resolved())
    }

    /// Routes a record to manual review when some level is unresolved or the
    /// confidence is under `min_confidence`.
    pub fn needs_review(&self, min_confidence: f64) -> bool {
        !self.is_fully_resolved() || self.confidence < min_confidence
    }

    /// `(level, code)` per attempted level: the resolved id or the
    /// `<level>_0` placeholder.
    pub fn codes(&self) -> Vec<(Level, String)> {
        self.levels
            .iter()
            .map(|l| {
                let code = match &l.resolved {
                    Some(c) => c.id.clone(),
                    None => l.level.placeholder_code(),
                };
                (l.level, code)
            })
            .collect()
    }
}

/// One-shot resolver over a borrowed store snapshot.
pub struct HierarchicalResolver<'a, S: Similarity> {
    store: &'a GazetteerStore,
    normalizer: &'a Normalizer,
    similarity: &'a S,
    thresholds: &'a LevelThresholds,
}

impl<'a, S: Similarity> HierarchicalResolver<'a, S> {
    pub fn new(
        store: &'a GazetteerStore,
        normalizer: &'a Normalizer,
        similarity: &'a S,
        thresholds: &'a LevelThresholds,
    ) -> Self {
        Self {
            store,
            normalizer,
            similarity,
            thresholds,
        }
    }

    /// Start level and parent for a resolution under `parent_id`.
    ///
    /// Fails with [`GazetteerError::InvalidHierarchyState`] when the parent is
    /// unknown to this store version or sits at the deepest level.
    pub fn anchor(&self, parent_id: Option<&str>) -> Result<(Option<NodeIndex>, Option<Level>)> {
        match parent_id {
            None => Ok((None, self.store.root_level())),
            Some(pid) => {
                let node = self.store.node(pid).ok_or_else(|| {
                    GazetteerError::InvalidHierarchyState(format!(
                        "parent {pid:?} does not exist in gazetteer version {}",
                        self.store.version()
                    ))
                })?;
                let start = node.level.child().ok_or_else(|| {
                    GazetteerError::InvalidHierarchyState(format!(
                        "parent {pid:?} is a {}; nothing can be resolved below it",
                        node.level
                    ))
                })?;
                Ok((Some(node.index), Some(start)))
            }
        }
    }

    pub fn resolve(
        &self,
        raw: &RawLocationInput,
        parent_id: Option<&str>,
    ) -> Result<ResolutionResult> {
        let (mut parent, start) = self.anchor(parent_id)?;
        let mut result = ResolutionResult {
            version: self.store.version(),
            anchor: parent_id.map(str::to_string),
            levels: Vec::new(),
            confidence: 0.0,
        };
        let Some(start) = start else {
            return Ok(result);
        };

        let mut running: Option<f64> = None;
        let mut stopped = false;

        for &level in &Level::ALL[start.depth()..] {
            let raw_text = raw.get(level);
            let normalized = self.normalizer.normalize(raw_text);
            let threshold = self.thresholds.get(level);
            let mut audit = AuditEntry {
                raw: raw_text.to_string(),
                normalized,
                best: None,
                candidates_scored: 0,
                threshold,
                decision: Decision::ParentUnresolved,
            };

            if level.is_optional() {
                let present = if stopped {
                    !raw_text.trim().is_empty()
                } else {
                    self.store.has_children_at(parent, level)
                };
                if !present {
                    continue;
                }
            }

            if stopped {
                result.levels.push(unresolved(level, audit));
                continue;
            }

            let Some(query) = audit.normalized.text().map(str::to_string) else {
                audit.decision = Decision::EmptyInput;
                debug!("{level}: empty input, stopping");
                stopped = true;
                result.levels.push(unresolved(level, audit));
                continue;
            };

            let kinds = raw.kinds(level);
            let admits = |n: &GazetteerNode| kinds.is_empty() || kinds.contains(&n.kind);
            let candidates: Vec<NodeIndex> = self
                .store
                .candidates(parent, level)
                .iter()
                .copied()
                .filter(|&i| self.store.node_at(i).is_some_and(admits))
                .collect();
            let exact = self
                .store
                .lookup(parent, &query)
                .filter(|n| n.level == level && admits(*n));
            let best = match exact {
                Some(exact) => Some((MatchCandidate::new(exact, 1.0), 0)),
                None => self
                    .best_of(&query, &candidates)
                    .map(|b| (b, candidates.len())),
            };
            let Some((best, scored)) = best else {
                audit.decision = Decision::NoCandidates;
                debug!("{level}: no candidates under {parent:?} (kinds {kinds:?}), stopping");
                stopped = true;
                result.levels.push(unresolved(level, audit));
                continue;
            };
            audit.candidates_scored = scored;

            if best.score < threshold {
                debug!(
                    "{level}: best {:?} scored {:.3} < {:.3}, stopping",
                    best.name, best.score, threshold
                );
                audit.decision = Decision::BelowThreshold;
                audit.best = Some(best);
                stopped = true;
                result.levels.push(unresolved(level, audit));
                continue;
            }

            let conf = running.map_or(best.score, |r| r.min(best.score));
            running = Some(conf);
            parent = Some(best.index);
            debug!("{level}: {:?} -> {} ({:.3})", audit.raw, best.id, best.score);
            audit.decision = Decision::Accepted;
            audit.best = Some(best.clone());
            result.levels.push(LevelResolution {
                level,
                resolved: Some(best),
                confidence: conf,
                audit,
            });
        }

        result.confidence = running.unwrap_or(0.0);
        Ok(result)
    }

    /// Highest score wins; ties go to the lexicographically smallest
    /// normalized name. `None` when there is nothing to score.
    fn best_of(&self, query: &str, candidates: &[NodeIndex]) -> Option<MatchCandidate> {
        let mut best: Option<(&GazetteerNode, f64)> = None;
        for node in candidates.iter().filter_map(|&i| self.store.node_at(i)) {
            let score = self.similarity.score(query, node.normalized_name());
            let better = match best {
                None => true,
                Some((b, bs)) => {
                    score > bs || (score == bs && node.normalized_name() < b.normalized_name())
                }
            };
            if better {
                best = Some((node, score));
            }
        }
        best.map(|(node, score)| MatchCandidate::new(node, score))
    }
}

fn unresolved(level: Level, audit: AuditEntry) -> LevelResolution {
    LevelResolution {
        level,
        resolved: None,
        confidence: 0.0,
        audit,
    }
}
