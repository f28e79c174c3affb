//! Reading-order reconstruction for a page's raw text fragments.
//!
//! Renderers report text as positioned runs with no reliable word or line
//! boundaries. [`TextNormalizer`] groups runs into lines, orders them
//! top-to-bottom and left-to-right, inserts synthetic spaces where runs are
//! visibly separated, and marks the last run of each line.

use std::cmp::Ordering;

use crate::fragment::{RawFragment, TextFragment};

/// Maximum baseline distance for two fragments to share a line.
pub const Y_TOLERANCE: f64 = 0.1;

/// Horizontal gaps at or below this are treated as touching.
pub const GAP_TOLERANCE: f64 = 0.01;

/// Options for text normalization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeOptions {
    /// Maximum baseline difference for fragments on the same line.
    pub y_tolerance: f64,
    /// Minimum gap between adjacent fragments before a space is inserted.
    pub gap_tolerance: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            y_tolerance: Y_TOLERANCE,
            gap_tolerance: GAP_TOLERANCE,
        }
    }
}

/// A line bucket: the baseline of the fragment that opened it, plus members.
struct Line {
    key: f64,
    fragments: Vec<TextFragment>,
}

/// Normalizes raw text content into reading-order fragments.
pub struct TextNormalizer;

impl TextNormalizer {
    /// Normalize one page's raw text content.
    ///
    /// - Marked-content markers, zero-width items, and malformed items are
    ///   dropped.
    /// - Fragments join the first existing line whose key is within
    ///   `y_tolerance` of their baseline, in line creation order. A fragment
    ///   close to two lines joins the older one even if the newer one is
    ///   nearer.
    /// - Each line is sorted by x and gets a `" "` fragment wherever the gap
    ///   to the next fragment exceeds `gap_tolerance`, unless either neighbor
    ///   is whitespace-only.
    /// - The last fragment of each line is the only one with
    ///   `line_terminal = true`.
    pub fn normalize(items: &[RawFragment], options: &NormalizeOptions) -> Vec<TextFragment> {
        let mut lines: Vec<Line> = Vec::new();
        let mut malformed = 0usize;

        for item in items {
            let RawFragment::Text(raw) = item else {
                continue;
            };
            let Some(fragment) = raw.to_fragment() else {
                malformed += 1;
                continue;
            };
            if fragment.width == 0.0 {
                continue;
            }

            let y = fragment.y();
            match lines
                .iter_mut()
                .find(|line| (y - line.key).abs() <= options.y_tolerance)
            {
                Some(line) => line.fragments.push(fragment),
                None => lines.push(Line {
                    key: y,
                    fragments: vec![fragment],
                }),
            }
        }
        trace_dropped(malformed);

        // Pre-ordering lines by key keeps the final tolerance sort close to linear.
        lines.sort_by(|a, b| b.key.total_cmp(&a.key));

        let mut result = Vec::with_capacity(items.len());
        for line in lines {
            result.extend(Self::process_line(line.fragments, options));
        }

        sort_reading_order(&mut result, options.y_tolerance);
        result
    }

    /// Sort one line by x, insert gap spaces, and mark the terminal fragment.
    fn process_line(mut fragments: Vec<TextFragment>, options: &NormalizeOptions) -> Vec<TextFragment> {
        fragments.sort_by(|a, b| a.x().total_cmp(&b.x()));

        let mut out: Vec<TextFragment> = Vec::with_capacity(fragments.len() * 2);
        for mut fragment in fragments {
            if let Some(previous) = out.last() {
                let gap = fragment.x() - previous.end_x();
                if gap > options.gap_tolerance
                    && !previous.is_whitespace_only()
                    && !fragment.is_whitespace_only()
                {
                    let space = previous.space_after(gap);
                    out.push(space);
                }
            }
            fragment.line_terminal = false;
            out.push(fragment);
        }

        if let Some(last) = out.last_mut() {
            last.line_terminal = true;
        }
        out
    }
}

/// Normalize with default tolerances.
pub fn normalize(items: &[RawFragment]) -> Vec<TextFragment> {
    TextNormalizer::normalize(items, &NormalizeOptions::default())
}

/// Descending baseline (within tolerance), then ascending x.
fn reading_order(a: &TextFragment, b: &TextFragment, y_tolerance: f64) -> Ordering {
    let y_diff = b.y() - a.y();
    if y_diff.abs() > y_tolerance {
        if y_diff > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    } else {
        a.x().partial_cmp(&b.x()).unwrap_or(Ordering::Equal)
    }
}

/// Stable insertion sort by [`reading_order`].
///
/// The tolerance comparison is not transitive, so the std sorts (which may
/// panic on an inconsistent ordering) cannot be used here.
fn sort_reading_order(fragments: &mut [TextFragment], y_tolerance: f64) {
    for i in 1..fragments.len() {
        let mut j = i;
        while j > 0 && reading_order(&fragments[j - 1], &fragments[j], y_tolerance) == Ordering::Greater {
            fragments.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn trace_dropped(count: usize) {
    #[cfg(feature = "tracing")]
    if count > 0 {
        tracing::debug!(count, "dropped malformed text items");
    }
}

/// Split a normalized stream into lines, each ending at a terminal fragment.
///
/// A trailing run without a terminal fragment forms its own line.
pub fn lines(fragments: &[TextFragment]) -> Vec<&[TextFragment]> {
    fragments
        .split_inclusive(|fragment| fragment.line_terminal)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Plain text of a normalized stream, one line per terminal fragment.
pub fn page_text(fragments: &[TextFragment]) -> String {
    lines(fragments)
        .iter()
        .map(|line| line.iter().map(|f| f.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
