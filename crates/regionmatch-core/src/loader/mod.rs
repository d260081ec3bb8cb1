// crates/regionmatch-core/src/loader/mod.rs

//! # Data Loader
//!
//! Reads reference rows from disk for the store. The store itself never
//! touches the filesystem.
//!
//! - JSON array of [`ReferenceRow`] (optionally `*.gz`)
//! - bincode snapshot written next to the source as `<file>.rows.bin` and
//!   reused while it is at least as new as the source

use crate::error::Result;
use crate::model::{GazetteerStore, CACHE_SUFFIX};
use crate::raw::ReferenceRow;
use crate::text::Normalizer;
use log::{debug, warn};
use std::path::{Path, PathBuf};

mod common_io;
mod snapshot;

pub use common_io::{get_cache_path, open_stream};
pub use snapshot::{read_snapshot, write_snapshot};

/// Directory holding the sample gazetteer shipped with this crate.
pub fn default_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn default_dataset_filename() -> &'static str {
    "karnataka.json"
}

/// Parses a JSON array of reference rows.
#[cfg(feature = "json")]
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<ReferenceRow>> {
    let reader = open_stream(path.as_ref())?;
    let rows: Vec<ReferenceRow> = serde_json::from_reader(reader)?;
    Ok(rows)
}

/// **Smart Load:** uses the binary snapshot when fresh, otherwise parses the
/// JSON source and refreshes the snapshot (best effort).
#[cfg(feature = "json")]
pub fn load_rows_cached(path: impl AsRef<Path>) -> Result<Vec<ReferenceRow>> {
    let path = path.as_ref();
    let cache_path = get_cache_path(path, CACHE_SUFFIX);

    if common_io::is_cache_fresh(path, &cache_path) {
        match read_snapshot(&cache_path) {
            Ok(rows) => {
                debug!("Using snapshot {}", cache_path.display());
                return Ok(rows);
            }
            Err(e) => warn!("Ignoring unreadable snapshot {}: {e}", cache_path.display()),
        }
    }

    let rows = load_rows(path)?;
    if let Err(e) = write_snapshot(&cache_path, &rows) {
        warn!("Could not write snapshot {}: {e}", cache_path.display());
    }
    Ok(rows)
}

impl GazetteerStore {
    /// Loads a store from a JSON reference file (through the snapshot cache).
    #[cfg(feature = "json")]
    pub fn load_from_path(path: impl AsRef<Path>, normalizer: &Normalizer) -> Result<Self> {
        let rows = load_rows_cached(path)?;
        Self::load(rows, normalizer)
    }

    /// Loads a store directly from a bincode snapshot.
    pub fn load_snapshot(path: impl AsRef<Path>, normalizer: &Normalizer) -> Result<Self> {
        let rows = read_snapshot(path.as_ref())?;
        Self::load(rows, normalizer)
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        write_snapshot(path.as_ref(), &self.to_rows())
    }
}
