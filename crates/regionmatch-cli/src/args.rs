use clap::{ArgAction, Parser, Subcommand};

/// CLI arguments for regionmatch
#[derive(Debug, Parser)]
#[command(
    name = "regionmatch",
    version,
    about = "Resolve free-text district / taluk / village names against a gazetteer"
)]
pub struct CliArgs {
    /// Path to the gazetteer JSON (or .json.gz) file (default: bundled Karnataka sample)
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<String>,

    /// Optional resolver config JSON (thresholds, abbreviations, rewrites)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the gazetteer contents
    Stats,

    /// List the top-level units
    Roots,

    /// List the children of a unit
    Children {
        /// Region id (e.g. district_572)
        id: String,

        /// Include every level below, not just direct children
        #[arg(long)]
        deep: bool,
    },

    /// Resolve a single record
    Resolve {
        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        district: Option<String>,

        /// Sub-district, taluk or ULB name
        #[arg(long, visible_alias = "taluk")]
        subdistrict: Option<String>,

        /// Only match sub-districts of these id kinds (e.g. "subdistrict" or "ulb,subdistrict")
        #[arg(long, visible_alias = "child-type")]
        subdistrict_kind: Option<String>,

        /// Zone name, for ULBs split into zones
        #[arg(long)]
        zone: Option<String>,

        /// Village or ward name
        #[arg(long, visible_alias = "ward")]
        village: Option<String>,

        /// Resolve below this region id instead of from the top level
        #[arg(long)]
        parent: Option<String>,

        /// Print the full result, including the audit trail, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a JSON array (or JSON lines) of records, writing one JSON result per line to stdout
    Batch {
        /// Input file ("-" for stdin)
        path: String,

        /// Resolve below this region id instead of from the top level
        #[arg(long)]
        parent: Option<String>,

        /// Flag results under this confidence for review
        #[arg(long, default_value_t = 0.0)]
        min_confidence: f64,
    },
}
