use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::anchor::capture::CaptureConfig;
use crate::anchor::resolver::ResolverConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "pinote",
    version,
    about = "Anchor comments to page elements and re-locate them later"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: pinote.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture an anchor for an element of a DOM snapshot
    Anchor {
        /// DOM snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Selector picking the target element (first match)
        #[arg(long)]
        target: String,

        /// Attach this comment and print a full annotation instead
        #[arg(long)]
        comment: Option<String>,
    },

    /// Resolve stored annotations against a DOM snapshot
    Resolve {
        /// DOM snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Annotations JSON file (array, or a page record with `annotations`)
        #[arg(long)]
        annotations: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Override the position-match tolerance in pixels
        #[arg(long)]
        position_tolerance: Option<f64>,
    },

    /// Print the structural path of an element
    Path {
        /// DOM snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Selector picking the target element (first match)
        #[arg(long)]
        target: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `pinote.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("pinote.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Resolver settings from the config file with CLI overrides applied.
pub fn build_resolver_config(config: &AppConfig, position_tolerance: Option<f64>) -> ResolverConfig {
    let mut resolver = config.resolver.clone();
    if let Some(tolerance) = position_tolerance {
        resolver.position_tolerance_px = tolerance;
    }
    resolver
}
