//! regionmatch: command-line interface for regionmatch-core
//!
//! Loads a gazetteer, optionally a resolver config, and then either
//! inspects the hierarchy or resolves line-list records against it.
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ regionmatch stats
//!
//! - List the children of a district, or everything below it
//!   $ regionmatch children district_572
//!   $ regionmatch children district_572 --deep
//!
//! - Resolve one record
//!   $ regionmatch resolve --district "bengaluru urbn" --taluk "bengaluru est" --village whitefeild
//!
//! - Resolve a JSON array or JSON-lines file below a known state
//!   $ regionmatch batch linelist.jsonl --parent state_29 --min-confidence 0.9
//!
//! Data source
//! -----------
//!
//! Without `--input` the Karnataka sample bundled with `regionmatch-core` is
//! used. A bincode snapshot is written next to the source and reused while
//! the source is unchanged.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use regionmatch_core::loader::{default_data_dir, default_dataset_filename};
use regionmatch_core::{GazetteerStore, RawLocationInput, ResolutionResult, ResolverConfig, Standardiser};
use serde::Serialize;
use std::io::{self, BufWriter, Write};

#[derive(Serialize)]
struct BatchLine<'a> {
    line: usize,
    needs_review: bool,
    #[serde(flatten)]
    result: &'a ResolutionResult,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let input_path = args.input.unwrap_or_else(|| {
        default_data_dir()
            .join(default_dataset_filename())
            .to_string_lossy()
            .to_string()
    });

    let config = match &args.config {
        Some(path) => ResolverConfig::from_path(path)
            .with_context(|| format!("reading config {path}"))?,
        None => ResolverConfig::default(),
    };

    let engine = Standardiser::from_path(config, &input_path)
        .with_context(|| format!("loading gazetteer {input_path}"))?;
    let store = engine.snapshot();

    match args.command {
        Commands::Stats => {
            let stats = store.stats();
            println!("Gazetteer statistics (version {}):", stats.version);
            println!("  States: {}", stats.states);
            println!("  Districts: {}", stats.districts);
            println!("  Sub-districts: {}", stats.subdistricts);
            println!("  Zones: {}", stats.zones);
            println!("  Villages/Wards: {}", stats.villages);
            println!("  Total: {}", stats.total());
        }

        Commands::Roots => match store.root_level() {
            Some(level) => {
                for node in store.roots_at(level) {
                    println!("{} ({})", node.name, node.id);
                }
            }
            None => println!("Gazetteer is empty"),
        },

        Commands::Children { id, deep } => match store.node(&id) {
            Some(_) if deep => {
                let base = store.ancestors(&id).len();
                for child in store.descendants(&id) {
                    let indent = "  ".repeat(store.ancestors(&child.id).len() - base);
                    println!("{indent}- {} ({}, {})", child.name, child.id, child.level);
                }
            }
            Some(node) => {
                let children = store.direct_children(&id);
                if children.is_empty() {
                    println!("{} ({}) has no children", node.name, node.level);
                }
                for child in children {
                    println!("- {} ({}, {})", child.name, child.id, child.kind);
                }
            }
            None => eprintln!("No region found for: {id}"),
        },

        Commands::Resolve {
            state,
            district,
            subdistrict,
            subdistrict_kind,
            zone,
            village,
            parent,
            json,
        } => {
            let raw = RawLocationInput {
                state,
                district,
                subdistrict,
                zone,
                village,
                subdistrict_kind,
            };
            let result = engine.resolve(&raw, parent.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }

        Commands::Batch {
            path,
            parent,
            min_confidence,
        } => run_batch(&engine, &store, &path, parent.as_deref(), min_confidence)?,
    }

    Ok(())
}

fn print_result(result: &ResolutionResult) {
    for level in &result.levels {
        match &level.resolved {
            Some(c) => println!(
                "{:<12} {:?} -> {} ({}) score {:.3}",
                level.level.as_str(),
                level.audit.raw,
                c.name,
                c.id,
                c.score
            ),
            None => {
                let best = level
                    .audit
                    .best
                    .as_ref()
                    .map(|b| format!(", best {} {:.3} < {:.2}", b.name, b.score, level.audit.threshold))
                    .unwrap_or_default();
                println!(
                    "{:<12} {:?} unresolved ({:?}{best})",
                    level.level.as_str(),
                    level.audit.raw,
                    level.audit.decision
                );
            }
        }
    }
    println!("confidence   {:.3}", result.confidence);
}

fn run_batch(
    engine: &Standardiser,
    store: &GazetteerStore,
    path: &str,
    parent: Option<&str>,
    min_confidence: f64,
) -> anyhow::Result<()> {
    let text = if path == "-" {
        io::read_to_string(io::stdin())?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?
    };

    let mut inputs = Vec::new();
    let mut lines = Vec::new();
    if text.trim_start().starts_with('[') {
        inputs = serde_json::from_str::<Vec<RawLocationInput>>(&text)
            .with_context(|| format!("parsing {path} as a JSON array"))?;
        lines.extend(1..=inputs.len());
    } else {
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RawLocationInput>(line) {
                Ok(raw) => {
                    inputs.push(raw);
                    lines.push(i + 1);
                }
                Err(e) => warn!("{path}:{}: skipping unparsable record: {e}", i + 1),
            }
        }
    }

    let results = engine.resolve_batch(&inputs, parent)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut review = 0;
    for (line, result) in lines.into_iter().zip(&results) {
        let needs_review = result.needs_review(min_confidence);
        review += usize::from(needs_review);
        serde_json::to_writer(
            &mut out,
            &BatchLine {
                line,
                needs_review,
                result,
            },
        )?;
        writeln!(out)?;
    }
    out.flush()?;

    let cache = engine.cache_stats();
    info!(
        "Resolved {} records against version {}: {} flagged for review, cache hit rate {:.1}%",
        results.len(),
        store.version(),
        review,
        cache.hit_rate() * 100.0
    );
    Ok(())
}
