use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use serde::Deserialize;
use textlayer_core::{NormalizeOptions, RawFragment, TextFragment, TextNormalizer};
use tracing_subscriber::EnvFilter;

use crate::page_range::parse_page_range;

/// A text-content dump: each page's size, rotation, and raw text items.
#[derive(Debug, Deserialize)]
pub struct Dump {
    pub pages: Vec<PageDump>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDump {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    /// The page's own rotation in degrees.
    #[serde(default)]
    pub rotate: i32,
    #[serde(default)]
    pub items: Vec<RawFragment>,
}

impl PageDump {
    pub fn fragments(&self) -> Vec<TextFragment> {
        TextNormalizer::normalize(&self.items, &NormalizeOptions::default())
    }
}

/// Read and parse a dump with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is missing,
/// unreadable, or not a valid dump.
pub fn load_dump(file: &Path) -> Result<Dump, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    let data = fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })?;
    let dump: Dump = serde_json::from_str(&data).map_err(|e| {
        eprintln!("Error: invalid text-content dump: {e}");
        1
    })?;
    tracing::debug!(pages = dump.pages.len(), "loaded dump");
    Ok(dump)
}

/// Select pages from a dump by an optional range string, in ascending page order.
pub fn resolve_pages<'a>(pages: Option<&str>, dump: &'a Dump) -> Result<Vec<&'a PageDump>, i32> {
    let mut selected: Vec<&PageDump> = match pages {
        Some(range) => {
            let available: Vec<usize> = dump.pages.iter().map(|p| p.page_number).collect();
            let wanted = parse_page_range(range, &available).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
            dump.pages
                .iter()
                .filter(|p| wanted.contains(&p.page_number))
                .collect()
        }
        None => dump.pages.iter().collect(),
    };
    selected.sort_by_key(|p| p.page_number);
    Ok(selected)
}

/// Serialize a JSON value for stdout.
pub fn to_json(value: &serde_json::Value) -> Result<String, i32> {
    serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Install the stderr log subscriber.
///
/// `-v` and `-vv` select debug and trace; without them `RUST_LOG` applies,
/// defaulting to warnings only.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Prints "Processing page N/M..." to stderr, but only on a terminal.
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report progress for the `current`-th page processed (1-based).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rProcessing page {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}
