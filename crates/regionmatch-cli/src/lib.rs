//! regionmatch-cli
//! ===============
//!
//! Command-line interface for the `regionmatch-core` resolution engine.
//!
//! This crate primarily provides a binary (`regionmatch`). The library target
//! only exists so that docs.rs renders this overview.
//!
//! Basic usage:
//!
//! ```text
//! regionmatch --help
//! regionmatch stats
//! regionmatch children district_572 --deep
//! regionmatch resolve --district "Bengaluru (U)" --taluk "bengaluru est" --village whitefeild
//! regionmatch -i regions.json -c config.json batch linelist.jsonl > resolved.jsonl
//! ```
//!
//! For programmatic access use the [`regionmatch-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
