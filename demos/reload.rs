//! Reload example for regionmatch-rs
//!
//! Resolves records on worker threads while the gazetteer is swapped for a
//! new version, then shows that cached results never outlive their version.

use regionmatch_core::{
    Level, RawLocationInput, ReferenceRow, Result, ResolverConfig, Standardiser,
};
use std::sync::Arc;
use std::thread;

fn gazetteer(village_name: &str) -> Vec<ReferenceRow> {
    vec![
        ReferenceRow::new("district_583", "Mandya", None),
        ReferenceRow::new("subdistrict_5600", "Maddur", Some("district_583")),
        ReferenceRow::new("village_14", village_name, Some("subdistrict_5600")),
        ReferenceRow::new("village_15", "Koppa", Some("subdistrict_5600")),
    ]
}

fn main() -> Result<()> {
    println!("=== regionmatch-rs Reload Example ===\n");

    let engine = Arc::new(Standardiser::new(
        ResolverConfig::default(),
        gazetteer("Besagarahalli"),
    )?);
    let raw = RawLocationInput::new("mandya", "maddur", "besagarahali");

    let before = engine.resolve(&raw, None)?;
    println!(
        "v{}: village -> {:?}",
        before.version,
        before.resolved(Level::Village).map(|c| c.name.as_str())
    );

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let raw = raw.clone();
            thread::spawn(move || {
                (0..1000)
                    .filter_map(|_| engine.resolve(&raw, None).ok())
                    .map(|r| r.version)
                    .max()
            })
        })
        .collect();

    let v2 = engine.reload(gazetteer("Besagarahalli Colony"))?;
    println!("Reloaded to v{v2}");

    for worker in workers {
        match worker.join() {
            Ok(newest) => println!("worker saw up to version {newest:?}"),
            Err(_) => eprintln!("worker panicked"),
        }
    }

    let after = engine.resolve(&raw, None)?;
    println!(
        "v{}: village -> {:?} ({:?})",
        after.version,
        after.resolved(Level::Village).map(|c| c.name.as_str()),
        after.level(Level::Village).map(|l| l.audit.decision)
    );

    // A broken file leaves the current version in place.
    let broken = vec![ReferenceRow::new("village_1", "Orphan", Some("subdistrict_404"))];
    if let Err(e) = engine.reload(broken) {
        println!("Rejected reload: {e}; still at v{}", engine.version());
    }

    let stats = engine.cache_stats();
    println!(
        "Cache: version {}, {} entries, hit rate {:.1}%, {} stale writes dropped",
        stats.version,
        stats.len,
        stats.hit_rate() * 100.0,
        stats.stale_writes
    );
    Ok(())
}
