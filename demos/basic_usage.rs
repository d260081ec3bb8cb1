//! Basic usage example for regionmatch-rs
//!
//! This example demonstrates how to:
//! - Load the bundled gazetteer with a resolver config
//! - Resolve misspelled and abbreviated line-list records
//! - Read per-level scores, audit decisions and placeholder codes
//! - Walk the hierarchy

use regionmatch_core::loader::{default_data_dir, default_dataset_filename};
use regionmatch_core::{Level, RawLocationInput, Result, ResolverConfig, Standardiser};

fn main() -> Result<()> {
    println!("=== regionmatch-rs Basic Usage Example ===\n");

    let config_path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/karnataka_config.json");
    let config = ResolverConfig::from_path(config_path)?;
    let engine = Standardiser::from_path(config, default_data_dir().join(default_dataset_filename()))?;
    let store = engine.snapshot();
    println!("✓ Gazetteer loaded: {} units, version {}\n", store.len(), store.version());

    // Example 1: a record with typos at every level
    println!("--- Example 1: Misspelled record ---");
    let raw = RawLocationInput::new("bengaluru urbn", "bengaluru est", "whitefeild");
    let result = engine.resolve(&raw, Some("state_29"))?;
    for level in &result.levels {
        match &level.resolved {
            Some(c) => println!("{:<12} {} ({}) score {:.3}", level.level.as_str(), c.name, c.id, c.score),
            None => println!("{:<12} unresolved: {:?}", level.level.as_str(), level.audit.decision),
        }
    }
    println!("Confidence: {:.3}\n", result.confidence);

    // Example 2: abbreviations and renamed districts
    println!("--- Example 2: Abbreviations and old names ---");
    let records = [
        RawLocationInput::new("Gulbarga Dt.", "Aland", "Narona"),
        RawLocationInput::new("BBMP", "Bengaluru (South)", "Begur"),
        RawLocationInput::new("Mysore", "Hunsur Tq", "Bilikere"),
    ];
    for raw in &records {
        let result = engine.resolve(raw, Some("state_29"))?;
        let codes: Vec<String> = result.codes().into_iter().map(|(_, c)| c).collect();
        println!(
            "{:?} -> {} (confidence {:.3}, review: {})",
            raw.district.as_deref().unwrap_or(""),
            codes.join(" / "),
            result.confidence,
            result.needs_review(0.9)
        );
    }
    println!();

    // Example 3: gating, nothing below an unresolved district is attempted
    println!("--- Example 3: Unknown district ---");
    let result = engine.resolve(&RawLocationInput::new("Atlantis", "Maddur", "Koppa"), Some("state_29"))?;
    if let Some(d) = result.level(Level::District) {
        println!("District decision: {:?}", d.audit.decision);
    }
    println!("Fully unresolved: {}\n", result.is_unresolved());

    // Example 4: hierarchy navigation
    println!("--- Example 4: Everything below Mandya ---");
    for node in store.descendants("district_583") {
        let depth = store.ancestors(&node.id).len() - 2;
        println!("{}- {} ({})", "  ".repeat(depth), node.name, node.id);
    }
    let chain: Vec<&str> = store.ancestors("village_14").iter().map(|n| n.name.as_str()).collect();
    println!("Ancestors of Besagarahalli: {}", chain.join(" > "));

    // Example 5: urban records carry a ULB and a zone instead of a taluk
    println!("\n--- Example 5: Urban wards ---");
    let urban = RawLocationInput::new("Bengaluru (U)", "Bruhat Bengaluru Mahanagara Palike", "Bellandur")
        .with_zone("Mahadevpura")
        .with_subdistrict_kind("ulb");
    let result = engine.resolve(&urban, Some("state_29"))?;
    let codes: Vec<String> = result.codes().into_iter().map(|(_, c)| c).collect();
    println!("{} (confidence {:.3})", codes.join(" / "), result.confidence);

    let stats = engine.cache_stats();
    println!("\nCache: {} entries, {} hits, {} misses", stats.len, stats.hits, stats.misses);
    Ok(())
}
