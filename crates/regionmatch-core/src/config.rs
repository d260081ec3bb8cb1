// crates/regionmatch-core/src/config.rs
use crate::common::Level;
use crate::error::{GazetteerError, Result};
use crate::matcher::{Levenshtein, DEFAULT_MAX_LENGTH_RATIO};
use crate::text::{Normalizer, DEFAULT_ABBREVIATIONS, DEFAULT_DESIGNATORS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Minimum score a best candidate needs to be accepted, per level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub state: f64,
    pub district: f64,
    pub subdistrict: f64,
    pub zone: f64,
    pub village: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            state: 0.90,
            district: 0.85,
            subdistrict: 0.80,
            zone: 0.80,
            village: 0.75,
        }
    }
}

impl LevelThresholds {
    /// The same threshold at every level.
    pub fn uniform(t: f64) -> Self {
        Self {
            state: t,
            district: t,
            subdistrict: t,
            zone: t,
            village: t,
        }
    }

    pub fn get(&self, level: Level) -> f64 {
        match level {
            Level::State => self.state,
            Level::District => self.district,
            Level::Subdistrict => self.subdistrict,
            Level::Zone => self.zone,
            Level::Village => self.village,
        }
    }

    pub fn min(&self) -> f64 {
        Level::ALL
            .iter()
            .map(|&l| self.get(l))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Everything the engine is configured with.
///
/// Every field has a default, so a JSON config only needs the keys it
/// changes. Supplying `abbreviations` or `designators` replaces the
/// built-in table rather than extending it.
///
/// ```json
/// {
///   "thresholds": { "district": 0.8, "village": 0.9 },
///   "rewrites": { "gulbarga": "kalaburagi" },
///   "cache_capacity": 50000
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub thresholds: LevelThresholds,
    pub abbreviations: BTreeMap<String, String>,
    /// Tier words dropped from names after expansion (`district`, `taluk`).
    pub designators: BTreeSet<String>,
    /// Whole-name renames applied after abbreviation expansion.
    pub rewrites: BTreeMap<String, String>,
    /// Maximum number of cached results; 0 disables the cache.
    pub cache_capacity: usize,
    /// Length-screen ratio for the Levenshtein matcher.
    pub max_length_ratio: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            thresholds: LevelThresholds::default(),
            abbreviations: DEFAULT_ABBREVIATIONS.clone(),
            designators: DEFAULT_DESIGNATORS.clone(),
            rewrites: BTreeMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_length_ratio: DEFAULT_MAX_LENGTH_RATIO,
        }
    }
}

impl ResolverConfig {
    /// Checks numeric ranges and that the length screen cannot reject a
    /// candidate some threshold would accept (`ratio >= 1 - min threshold`).
    pub fn validate(&self) -> Result<()> {
        for level in Level::ALL {
            let t = self.thresholds.get(level);
            if !(0.0..=1.0).contains(&t) {
                return Err(GazetteerError::InvalidConfig(format!(
                    "{level} threshold {t} is outside [0, 1]"
                )));
            }
        }
        let ratio = self.max_length_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(GazetteerError::InvalidConfig(format!(
                "max_length_ratio {ratio} is outside [0, 1]"
            )));
        }
        let floor = 1.0 - self.thresholds.min();
        if ratio + 1e-9 < floor {
            return Err(GazetteerError::InvalidConfig(format!(
                "max_length_ratio {ratio} would screen out candidates scoring up to {floor:.3}, \
                 above the lowest threshold"
            )));
        }
        Ok(())
    }

    pub fn normalizer(&self) -> Result<Normalizer> {
        Normalizer::new(&self.abbreviations, &self.rewrites, &self.designators)
    }

    pub fn similarity(&self) -> Levenshtein {
        Levenshtein::new(self.max_length_ratio)
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and validates a JSON config file (`*.gz` is gunzipped when the
    /// `compact` feature is on).
    #[cfg(feature = "json")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let reader = crate::loader::open_stream(path.as_ref())?;
        let cfg: Self = serde_json::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
