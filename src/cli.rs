use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Grix protocol adapters: check, exercise and scaffold venue adapters
/// for options and perpetual-futures market data.
#[derive(Parser)]
#[command(name = "grix", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone)]
pub struct GlobalArgs {
    /// Network adapters connect to (mainnet or testnet)
    #[arg(long, global = true, default_value = "mainnet")]
    pub network: String,

    /// Per-request timeout for venue HTTP clients, in milliseconds
    #[arg(long, global = true, default_value = "10000")]
    pub timeout_ms: u64,

    /// Hex private key for venues that quote against a trader address
    #[arg(long, global = true, env = "GRIX_SIGNING_KEY", hide_env_values = true)]
    pub signing_key: Option<String>,

    /// Override the adapter's API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all registered adapters
    List,

    /// Check that changed adapters follow the adapter structure (CI gate)
    CheckStructure {
        /// Repository root containing src/options and src/perps
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// File listing changed paths, one per line (skips git detection)
        #[arg(long)]
        changed_files: Option<PathBuf>,

        /// Validate every adapter regardless of the change set
        #[arg(long)]
        all: bool,
    },

    /// Run the conformance suite against a registered adapter
    Conformance {
        /// Registered adapter name (e.g. deribit, hyperliquid)
        adapter: String,

        /// Require sequence results to be non-empty
        #[arg(long)]
        require_non_empty: bool,

        /// Only check result shapes, not domain invariants
        #[arg(long)]
        lenient: bool,

        /// Do not fail the run on operations the adapter has not implemented
        #[arg(long)]
        allow_unimplemented: bool,
    },

    /// Generate a new perps adapter from the template adapter
    Scaffold {
        /// Protocol name (prompted for when omitted)
        name: Option<String>,

        /// Repository root containing src/perps/adapters
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Comma-separated features: historical, predicted, oi-cap, all, none
        #[arg(long)]
        features: Option<String>,

        /// Overwrite an existing adapter directory without asking
        #[arg(long)]
        force: bool,
    },

    /// Generate README.md API documentation for an adapter
    Docs {
        /// Adapter directory name
        adapter: String,

        /// Repository root containing src/options and src/perps
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}
