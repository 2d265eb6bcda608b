//! CLI definitions for Tabsling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tabsling_config::UrlSensitivity;

/// Tabsling CLI.
#[derive(Parser)]
#[command(name = "tabsling")]
#[command(about = "Right-click link and selection opener")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long, global = true, env = "TABSLING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Drive pages through a recorded event trace and print opened URLs
    Replay {
        /// Path to the trace JSON file
        trace: PathBuf,
    },

    /// Print the URL candidates found in text
    Lex {
        /// Text to scan
        text: String,

        /// Sensitivity profile (strict, standard, relaxed)
        #[arg(short, long, default_value_t = UrlSensitivity::Standard)]
        sensitivity: UrlSensitivity,
    },

    /// Print the effective settings as JSON
    Settings,
}
