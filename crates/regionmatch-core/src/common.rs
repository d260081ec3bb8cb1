// crates/regionmatch-core/src/common.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One tier of the administrative nesting, shallowest first.
///
/// Revenue and urban hierarchies share the same tiers: a taluk or an urban
/// local body sits at [`Level::Subdistrict`], a village or ward at
/// [`Level::Village`]. [`Level::Zone`] is the optional urban tier between a
/// ULB and its wards; nodes may skip it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    State,
    District,
    #[serde(alias = "sub-district", alias = "taluk", alias = "ulb")]
    Subdistrict,
    Zone,
    #[serde(alias = "ward")]
    Village,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::State,
        Level::District,
        Level::Subdistrict,
        Level::Zone,
        Level::Village,
    ];

    /// Zero-based depth (State = 0).
    #[inline]
    pub fn depth(self) -> usize {
        self as usize
    }

    /// The level directly below this one, if any.
    pub fn child(self) -> Option<Level> {
        Level::ALL.get(self.depth() + 1).copied()
    }

    /// The level directly above this one, if any.
    pub fn parent(self) -> Option<Level> {
        self.depth().checked_sub(1).map(|d| Level::ALL[d])
    }

    /// Tiers a hierarchy may skip.
    pub fn is_optional(self) -> bool {
        matches!(self, Level::Zone)
    }

    /// Whether a node at `child` may hang directly below a node at `self`:
    /// the next level, or the one after it when the next is optional.
    pub fn accepts_child(self, child: Level) -> bool {
        match self.child() {
            Some(next) if next == child => true,
            Some(next) if next.is_optional() => next.child() == Some(child),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::State => "state",
            Level::District => "district",
            Level::Subdistrict => "subdistrict",
            Level::Zone => "zone",
            Level::Village => "village",
        }
    }

    /// Code written into standardised columns when this level is unresolved.
    pub fn placeholder_code(self) -> String {
        format!("{}_0", self.as_str())
    }

    /// Infers the level from a region id prefix such as `district_572` or
    /// `ward_1-12`.
    pub fn from_id_prefix(id: &str) -> Option<Level> {
        let prefix = id.split('_').next()?;
        match prefix.to_ascii_lowercase().as_str() {
            "state" => Some(Level::State),
            "district" => Some(Level::District),
            "subdistrict" | "ulb" => Some(Level::Subdistrict),
            "zone" => Some(Level::Zone),
            "village" | "ward" => Some(Level::Village),
            _ => None,
        }
    }
}

/// Lowercased id prefix (`ulb` for `ulb_802`) when it names a level,
/// otherwise the level's own name.
pub fn id_kind(id: &str, level: Level) -> String {
    match id.split('_').next() {
        Some(prefix) if Level::from_id_prefix(id).is_some() => prefix.to_ascii_lowercase(),
        _ => level.as_str().to_string(),
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Ok(Level::State),
            "district" => Ok(Level::District),
            "subdistrict" | "sub-district" | "taluk" | "ulb" => Ok(Level::Subdistrict),
            "zone" => Ok(Level::Zone),
            "village" | "ward" => Ok(Level::Village),
            other => Err(format!("unknown hierarchy level: {other}")),
        }
    }
}

/// Per-level node counts for a loaded store.
///
/// Returned by [`crate::GazetteerStore::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub version: u64,
    pub states: usize,
    pub districts: usize,
    pub subdistricts: usize,
    pub zones: usize,
    pub villages: usize,
}

impl StoreStats {
    pub fn total(&self) -> usize {
        self.states + self.districts + self.subdistricts + self.zones + self.villages
    }

    pub(crate) fn bump(&mut self, level: Level) {
        match level {
            Level::State => self.states += 1,
            Level::District => self.districts += 1,
            Level::Subdistrict => self.subdistricts += 1,
            Level::Zone => self.zones += 1,
            Level::Village => self.villages += 1,
        }
    }
}
