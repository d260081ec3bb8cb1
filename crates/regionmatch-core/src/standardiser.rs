// crates/regionmatch-core/src/standardiser.rs
use crate::cache::{CacheKey, CacheStats, ResolutionCache};
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::matcher::Levenshtein;
use crate::model::GazetteerStore;
use crate::raw::ReferenceRow;
use crate::resolver::{HierarchicalResolver, RawLocationInput, ResolutionResult};
use crate::text::Normalizer;
use crate::traits::Similarity;
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

/// The engine a preprocessing pipeline talks to.
///
/// Holds the current gazetteer snapshot, the normalizer and metric it was
/// built with, and the shared result cache. Every method takes `&self`;
/// wrap it in an `Arc` to share it between worker threads.
///
/// # Example
///
/// ```rust
/// use regionmatch_core::{Level, RawLocationInput, ReferenceRow, ResolverConfig, Standardiser};
///
/// let rows = vec![
///     ReferenceRow::new("district_583", "Mandya", None),
///     ReferenceRow::new("subdistrict_5600", "Maddur", Some("district_583")),
/// ];
/// let engine = Standardiser::new(ResolverConfig::default(), rows).unwrap();
///
/// let result = engine
///     .resolve(&RawLocationInput::new("Mandya Dist.", "maddur", ""), None)
///     .unwrap();
/// assert_eq!(result.resolved(Level::District).unwrap().id, "district_583");
/// assert_eq!(result.confidence, 1.0);
/// assert!(result.resolved(Level::Village).is_none());
/// ```
pub struct Standardiser<S: Similarity = Levenshtein> {
    config: ResolverConfig,
    normalizer: Normalizer,
    similarity: S,
    store: RwLock<Arc<GazetteerStore>>,
    cache: ResolutionCache,
}

impl Standardiser<Levenshtein> {
    /// Validates `config`, builds the normalizer and loads the first
    /// gazetteer version.
    pub fn new<I>(config: ResolverConfig, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = ReferenceRow>,
    {
        let similarity = config.similarity();
        Self::with_similarity(config, rows, similarity)
    }
}

impl<S: Similarity> Standardiser<S> {
    pub fn with_similarity<I>(config: ResolverConfig, rows: I, similarity: S) -> Result<Self>
    where
        I: IntoIterator<Item = ReferenceRow>,
    {
        config.validate()?;
        let normalizer = config.normalizer()?;
        let store = GazetteerStore::load(rows, &normalizer)?;
        let cache = ResolutionCache::new(config.cache_capacity, store.version());
        Ok(Self {
            config,
            normalizer,
            similarity,
            store: RwLock::new(Arc::new(store)),
            cache,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The current store. Holding the `Arc` keeps that version alive even
    /// across a reload.
    pub fn snapshot(&self) -> Arc<GazetteerStore> {
        Arc::clone(&self.store.read())
    }

    pub fn version(&self) -> u64 {
        self.store.read().version()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Builds a new store from `rows` and swaps it in.
    ///
    /// The new store is built without holding any lock. The swap and the
    /// cache invalidation then happen under the write lock together, so a
    /// reader sees either the old version with its cache or the new version
    /// with an empty cache. On error the current version stays in place.
    pub fn reload<I>(&self, rows: I) -> Result<u64>
    where
        I: IntoIterator<Item = ReferenceRow>,
    {
        let fresh = match GazetteerStore::load(rows, &self.normalizer) {
            Ok(store) => store,
            Err(e) => {
                warn!("Gazetteer reload failed, keeping version {}: {e}", self.version());
                return Err(e);
            }
        };
        Ok(self.install(Arc::new(fresh)))
    }

    /// Swaps `fresh` in unless a newer version is already installed, which
    /// happens when two reloads finish out of order. Returns the version
    /// current afterwards.
    fn install(&self, fresh: Arc<GazetteerStore>) -> u64 {
        let version = fresh.version();
        let mut guard = self.store.write();
        let previous = guard.version();
        if version <= previous {
            debug!("Discarding gazetteer version {version}; version {previous} is newer");
            return previous;
        }
        *guard = fresh;
        self.cache.invalidate(version);
        drop(guard);
        info!("Gazetteer reloaded: version {previous} -> {version}");
        version
    }

    /// Resolves one record against the current version, consulting the
    /// cache first.
    pub fn resolve(
        &self,
        raw: &RawLocationInput,
        parent_id: Option<&str>,
    ) -> Result<ResolutionResult> {
        let store = self.snapshot();
        self.resolve_on(&store, raw, parent_id)
    }

    /// Resolves without reading or writing the cache.
    pub fn resolve_uncached(
        &self,
        raw: &RawLocationInput,
        parent_id: Option<&str>,
    ) -> Result<ResolutionResult> {
        let store = self.snapshot();
        self.resolver(&store).resolve(raw, parent_id)
    }

    /// Resolves a batch against a single snapshot.
    ///
    /// `parent_id` is checked once up front; after that every record yields a
    /// result, resolved or not, so one bad record never stops the batch.
    pub fn resolve_batch<'r, I>(
        &self,
        inputs: I,
        parent_id: Option<&str>,
    ) -> Result<Vec<ResolutionResult>>
    where
        I: IntoIterator<Item = &'r RawLocationInput>,
    {
        let store = self.snapshot();
        self.resolver(&store).anchor(parent_id)?;
        inputs
            .into_iter()
            .map(|raw| self.resolve_on(&store, raw, parent_id))
            .collect()
    }

    fn resolve_on(
        &self,
        store: &GazetteerStore,
        raw: &RawLocationInput,
        parent_id: Option<&str>,
    ) -> Result<ResolutionResult> {
        let key = CacheKey::new(store.version(), parent_id, raw);
        self.cache
            .get_or_compute(key, || self.resolver(store).resolve(raw, parent_id))
    }

    fn resolver<'a>(&'a self, store: &'a GazetteerStore) -> HierarchicalResolver<'a, S> {
        HierarchicalResolver::new(store, &self.normalizer, &self.similarity, &self.config.thresholds)
    }

    /// Loads the first version from a reference file on disk.
    #[cfg(feature = "json")]
    pub fn from_path_with_similarity(
        config: ResolverConfig,
        path: impl AsRef<std::path::Path>,
        similarity: S,
    ) -> Result<Self> {
        let rows = crate::loader::load_rows_cached(path.as_ref())?;
        Self::with_similarity(config, rows, similarity)
    }

    /// Reloads from a reference file on disk.
    #[cfg(feature = "json")]
    pub fn reload_from_path(&self, path: impl AsRef<std::path::Path>) -> Result<u64> {
        let rows = crate::loader::load_rows_cached(path.as_ref())?;
        self.reload(rows)
    }
}

#[cfg(feature = "json")]
impl Standardiser<Levenshtein> {
    pub fn from_path(config: ResolverConfig, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let similarity = config.similarity();
        Self::from_path_with_similarity(config, path, similarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Level;

    fn rows(name: &str) -> Vec<ReferenceRow> {
        vec![ReferenceRow::new("district_583", name, None)]
    }

    #[test]
    fn older_store_never_replaces_a_newer_one() {
        let engine = Standardiser::new(ResolverConfig::default(), rows("Mandya")).unwrap();
        let normalizer = engine.normalizer().clone();
        let older = Arc::new(GazetteerStore::load(rows("Mandya Old"), &normalizer).unwrap());
        let newer = Arc::new(GazetteerStore::load(rows("Mandya New"), &normalizer).unwrap());
        assert!(older.version() < newer.version());

        assert_eq!(engine.install(newer.clone()), newer.version());
        assert_eq!(engine.install(older), newer.version());
        assert_eq!(engine.version(), newer.version());

        let r = engine
            .resolve(&RawLocationInput::new("mandya new", "", ""), None)
            .unwrap();
        assert_eq!(r.version, newer.version());
        assert_eq!(r.resolved(Level::District).unwrap().name, "Mandya New");
    }
}
