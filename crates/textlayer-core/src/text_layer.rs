//! Rendered text layer access.
//!
//! The match locator never touches a layout engine directly. It reads page
//! containers and their text spans through [`PageContainer`] and
//! [`TextSpan`], so the same code runs against a browser's live layout (via
//! measured snapshots) or the headless layout in [`crate::layout`].

use std::ops::Range;

use crate::error::MeasureError;
use crate::geometry::Rect;

/// Boxes closer than this (in pixels) count as touching when merging
/// per-character boxes into line boxes.
const MERGE_EPSILON: f64 = 0.5;

/// One rendered span of a text layer.
pub trait TextSpan {
    /// The span's text content.
    fn text(&self) -> &str;

    /// Client rectangles covering the byte range `range` of [`text`](Self::text).
    ///
    /// Returns one rectangle per visual line the range occupies.
    fn client_rects(&self, range: Range<usize>) -> Result<Vec<Rect>, MeasureError>;
}

/// A mounted page: its bounding box and, once rendered, its text layer.
pub trait PageContainer {
    type Span: TextSpan;

    /// Bounding box of the page container in client coordinates.
    fn bounding_rect(&self) -> Rect;

    /// The page's text spans in reading order, or `None` while the text
    /// layer has not been rendered yet.
    fn text_layer(&self) -> Option<&[Self::Span]>;
}

/// A text span with one measured box per character.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MeasuredSpan {
    pub text: String,
    /// Client rectangle of each Unicode scalar of `text`, in order.
    pub char_rects: Vec<Rect>,
}

impl MeasuredSpan {
    pub fn new(text: impl Into<String>, char_rects: Vec<Rect>) -> Self {
        Self {
            text: text.into(),
            char_rects,
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), MeasureError> {
        let len = self.text.len();
        if range.start > range.end || range.end > len {
            return Err(MeasureError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        for offset in [range.start, range.end] {
            if !self.text.is_char_boundary(offset) {
                return Err(MeasureError::NotCharBoundary(offset));
            }
        }
        let chars = self.text.chars().count();
        if chars != self.char_rects.len() {
            return Err(MeasureError::StaleLayout {
                chars,
                rects: self.char_rects.len(),
            });
        }
        Ok(())
    }
}

impl TextSpan for MeasuredSpan {
    fn text(&self) -> &str {
        &self.text
    }

    fn client_rects(&self, range: Range<usize>) -> Result<Vec<Rect>, MeasureError> {
        self.check_range(&range)?;

        let first = self.text[..range.start].chars().count();
        let count = self.text[range.clone()].chars().count();

        let mut rects: Vec<Rect> = Vec::new();
        for rect in &self.char_rects[first..first + count] {
            match rects.last_mut() {
                Some(last) if continues_line(last, rect) => {
                    *last = last.to_bbox().union(&rect.to_bbox()).to_rect();
                }
                _ => rects.push(*rect),
            }
        }
        Ok(rects)
    }
}

/// Whether `next` sits on the same visual line as `last` and touches it.
///
/// Uses the direction-agnostic gap between intervals, so runs laid out
/// right-to-left or top-to-bottom (rotated pages) merge as well.
fn continues_line(last: &Rect, next: &Rect) -> bool {
    let gap = |a0: f64, a1: f64, b0: f64, b1: f64| (a0.max(b0) - a1.min(b1)).max(0.0);

    let same_row = (last.top - next.top).abs() <= MERGE_EPSILON
        && (last.bottom() - next.bottom()).abs() <= MERGE_EPSILON;
    let same_column = (last.left - next.left).abs() <= MERGE_EPSILON
        && (last.right() - next.right()).abs() <= MERGE_EPSILON;

    (same_row && gap(last.left, last.right(), next.left, next.right()) <= MERGE_EPSILON)
        || (same_column && gap(last.top, last.bottom(), next.top, next.bottom()) <= MERGE_EPSILON)
}

/// A page container with a measured text layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MeasuredPage {
    pub page_number: usize,
    /// Container bounding box in client coordinates.
    pub container: Rect,
    /// Spans in reading order; `None` while the text layer is pending.
    #[cfg_attr(feature = "serde", serde(default))]
    pub text_layer: Option<Vec<MeasuredSpan>>,
}

impl MeasuredPage {
    pub fn new(page_number: usize, container: Rect, spans: Vec<MeasuredSpan>) -> Self {
        Self {
            page_number,
            container,
            text_layer: Some(spans),
        }
    }

    /// A mounted page whose text layer has not been rendered yet.
    pub fn pending(page_number: usize, container: Rect) -> Self {
        Self {
            page_number,
            container,
            text_layer: None,
        }
    }
}

impl PageContainer for MeasuredPage {
    type Span = MeasuredSpan;

    fn bounding_rect(&self) -> Rect {
        self.container
    }

    fn text_layer(&self) -> Option<&[MeasuredSpan]> {
        self.text_layer.as_deref()
    }
}
