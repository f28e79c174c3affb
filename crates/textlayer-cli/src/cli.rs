use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Rebuild PDF text layers from text-content dumps and locate search highlights.
#[derive(Debug, Parser)]
#[command(name = "textlayer", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG is used otherwise
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List normalized text fragments in reading order
    Fragments {
        /// Path to the JSON text-content dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print reconstructed page text
    Text {
        /// Path to the JSON text-content dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },

    /// Locate a query and print highlight rectangles
    Search {
        /// Path to the JSON text-content dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Text to search for (matched literally)
        #[arg(value_name = "QUERY")]
        query: String,

        /// Pages to mount (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Zoom level in percent (clamped to 50..=500)
        #[arg(long, default_value_t = 100)]
        scale: i64,

        /// Extra rotation in degrees, added to each page's own rotation
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        rotation: i32,

        /// Current match, 1-based
        #[arg(long, default_value_t = 1)]
        current: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for tabular subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    Text,
    Json,
}
