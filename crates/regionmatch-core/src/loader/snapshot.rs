// crates/regionmatch-core/src/loader/snapshot.rs
use crate::error::{GazetteerError, Result};
use crate::raw::ReferenceRow;
use bincode::Options;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// Guards against decoding a corrupt or hostile file into a huge allocation.
const SNAPSHOT_LIMIT: u64 = 256 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_LIMIT)
        .allow_trailing_bytes()
}

/// Writes rows as a bincode snapshot.
pub fn write_snapshot(path: &Path, rows: &[ReferenceRow]) -> Result<()> {
    let file = File::create(path).map_err(GazetteerError::Io)?;
    let mut writer = BufWriter::new(file);
    options().serialize_into(&mut writer, rows)?;
    writer.flush().map_err(GazetteerError::Io)?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<ReferenceRow>> {
    let file = File::open(path).map_err(|e| {
        GazetteerError::NotFound(format!("Snapshot not found at {}: {}", path.display(), e))
    })?;
    let rows = options().deserialize_from(BufReader::new(file))?;
    Ok(rows)
}
