//! Match location: find a query in rendered text layers and return
//! page-relative highlight rectangles.

use std::collections::BTreeMap;

use regex::Regex;

use crate::geometry::Rect;
use crate::text_layer::{PageContainer, TextSpan};

/// Options controlling match location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct SearchOptions {
    /// Whether matching is case-sensitive (default: `false`).
    pub case_sensitive: bool,
}

/// One highlight rectangle, relative to its page container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct HighlightRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    /// Global index of the occurrence this rectangle belongs to.
    pub match_index: usize,
}

impl HighlightRect {
    pub fn rect(&self) -> Rect {
        Rect::new(self.top, self.left, self.width, self.height)
    }
}

/// All highlight rectangles on one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PageHighlights {
    pub page_number: usize,
    pub highlights: Vec<HighlightRect>,
}

impl PageHighlights {
    /// Rectangles paired with their visual treatment, given the current
    /// match index.
    pub fn styled(&self, current: usize) -> impl Iterator<Item = (&HighlightRect, HighlightKind)> {
        self.highlights
            .iter()
            .map(move |rect| (rect, HighlightKind::for_match(rect.match_index, current)))
    }
}

/// One occurrence of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SearchMatch {
    pub page_number: usize,
    pub match_index: usize,
}

/// Highlights grouped by page plus the ordered list of occurrences.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LocateResult {
    /// Pages with at least one highlight rectangle, ascending by page number.
    pub highlights: Vec<PageHighlights>,
    /// Occurrences in document order; `matches[i].match_index == i`.
    pub matches: Vec<SearchMatch>,
}

impl LocateResult {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Highlights for one page, if it has any.
    pub fn page(&self, page_number: usize) -> Option<&PageHighlights> {
        self.highlights
            .iter()
            .find(|page| page.page_number == page_number)
    }
}

/// Visual treatment of a highlight rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum HighlightKind {
    /// The occurrence the navigation pointer is on.
    Current,
    /// Any other occurrence.
    Match,
}

impl HighlightKind {
    pub fn for_match(match_index: usize, current: usize) -> Self {
        if match_index == current {
            HighlightKind::Current
        } else {
            HighlightKind::Match
        }
    }

    /// CSS fill color: translucent orange for the current match, translucent
    /// yellow otherwise.
    pub fn fill(self) -> &'static str {
        match self {
            HighlightKind::Current => "rgba(255, 165, 0, 0.6)",
            HighlightKind::Match => "rgba(255, 255, 0, 0.4)",
        }
    }
}

/// Compile a query into a literal pattern. Empty queries yield `None`.
pub fn build_pattern(query: &str, options: &SearchOptions) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    let escaped = regex::escape(query);
    let pattern = if options.case_sensitive {
        escaped
    } else {
        format!("(?i){escaped}")
    };
    // An escaped literal always compiles; a size-limit failure is treated as no match.
    Regex::new(&pattern).ok()
}

/// Find every occurrence of `query` in the mounted pages.
///
/// Pages are visited in ascending page number, spans in text-layer order,
/// and occurrences left to right within each span. Matches never cross span
/// boundaries. Pages whose text layer is not rendered yet contribute
/// nothing. An occurrence whose measurement fails is skipped without
/// consuming an index.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use textlayer_core::geometry::Rect;
/// use textlayer_core::search::{locate, SearchOptions};
/// use textlayer_core::text_layer::{MeasuredPage, MeasuredSpan};
///
/// let rects = (0..5).map(|i| Rect::new(10.0, 10.0 + 8.0 * i as f64, 8.0, 12.0)).collect();
/// let span = MeasuredSpan::new("Hello", rects);
/// let mut pages = BTreeMap::new();
/// pages.insert(1, MeasuredPage::new(1, Rect::new(0.0, 0.0, 600.0, 800.0), vec![span]));
///
/// let result = locate("ell", &SearchOptions::default(), &pages);
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.highlights[0].highlights[0].left, 18.0);
/// ```
pub fn locate<C: PageContainer>(
    query: &str,
    options: &SearchOptions,
    pages: &BTreeMap<usize, C>,
) -> LocateResult {
    let Some(re) = build_pattern(query, options) else {
        return LocateResult::default();
    };

    let mut result = LocateResult::default();

    for (&page_number, container) in pages {
        let Some(spans) = container.text_layer() else {
            continue;
        };
        let origin = container.bounding_rect();
        let mut rects = Vec::new();

        for (span_index, span) in spans.iter().enumerate() {
            for found in re.find_iter(span.text()) {
                let measured = match span.client_rects(found.range()) {
                    Ok(measured) => measured,
                    Err(err) => {
                        trace_skipped(page_number, span_index, &err);
                        continue;
                    }
                };
                let match_index = result.matches.len();
                rects.extend(measured.into_iter().map(|rect| HighlightRect {
                    top: rect.top - origin.top,
                    left: rect.left - origin.left,
                    width: rect.width,
                    height: rect.height,
                    match_index,
                }));
                result.matches.push(SearchMatch {
                    page_number,
                    match_index,
                });
            }
        }

        if !rects.is_empty() {
            result.highlights.push(PageHighlights {
                page_number,
                highlights: rects,
            });
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        query,
        matches = result.matches.len(),
        pages = result.highlights.len(),
        "located matches"
    );
    result
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn trace_skipped(page_number: usize, span_index: usize, err: &crate::error::MeasureError) {
    #[cfg(feature = "tracing")]
    tracing::debug!(page_number, span_index, %err, "skipped unmeasurable match");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::text_layer::{MeasuredPage, MeasuredSpan};
    use std::ops::Range;

    fn mono_span(text: &str, left: f64, top: f64) -> MeasuredSpan {
        let rects = (0..text.chars().count())
            .map(|i| Rect::new(top, left + 10.0 * i as f64, 10.0, 12.0))
            .collect();
        MeasuredSpan::new(text, rects)
    }

    fn page(number: usize, top: f64, texts: &[&str]) -> MeasuredPage {
        let spans = texts
            .iter()
            .enumerate()
            .map(|(i, text)| mono_span(text, 20.0, top + 20.0 + 15.0 * i as f64))
            .collect();
        MeasuredPage::new(number, Rect::new(top, 10.0, 600.0, 800.0), spans)
    }

    fn pages(list: Vec<MeasuredPage>) -> BTreeMap<usize, MeasuredPage> {
        list.into_iter().map(|p| (p.page_number, p)).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let pages = pages(vec![page(1, 0.0, &["foo"])]);
        assert_eq!(locate("", &SearchOptions::default(), &pages), LocateResult::default());
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let pages = pages(vec![page(1, 0.0, &["Foo foo FOO"])]);
        let result = locate("foo", &SearchOptions::default(), &pages);
        assert_eq!(result.len(), 3);
        let sensitive = locate("foo", &SearchOptions { case_sensitive: true }, &pages);
        assert_eq!(sensitive.len(), 1);
        assert_eq!(sensitive.highlights[0].highlights[0].left, 10.0 + 40.0);
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let pages = pages(vec![page(1, 0.0, &["a.b axb (c) [d]"])]);
        assert_eq!(locate("a.b", &SearchOptions::default(), &pages).len(), 1);
        assert_eq!(locate("(c)", &SearchOptions::default(), &pages).len(), 1);
        assert_eq!(locate("[d]", &SearchOptions::default(), &pages).len(), 1);
        assert_eq!(locate("\\", &SearchOptions::default(), &pages).len(), 0);
    }

    #[test]
    fn test_rects_are_page_relative() {
        let pages = pages(vec![page(1, 0.0, &["x"]), page(2, 1000.0, &["x"])]);
        let result = locate("x", &SearchOptions::default(), &pages);
        assert_eq!(result.highlights.len(), 2);
        for page in &result.highlights {
            assert_eq!(page.highlights[0].rect(), Rect::new(20.0, 10.0, 10.0, 12.0));
        }
    }

    #[test]
    fn test_indices_follow_page_then_span_order() {
        // Insert out of order; iteration is still ascending.
        let mut map = BTreeMap::new();
        map.insert(3, page(3, 2000.0, &["ab ab"]));
        map.insert(1, page(1, 0.0, &["ab", "xx ab"]));
        let result = locate("ab", &SearchOptions::default(), &map);
        let order: Vec<(usize, usize)> = result
            .matches
            .iter()
            .map(|m| (m.page_number, m.match_index))
            .collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (3, 2), (3, 3)]);
        assert_eq!(result.highlights[0].highlights[1].top, 35.0);
    }

    #[test]
    fn test_matches_do_not_cross_spans() {
        let pages = pages(vec![page(1, 0.0, &["foo", "bar"])]);
        assert!(locate("foobar", &SearchOptions::default(), &pages).is_empty());
        assert!(locate("foo bar", &SearchOptions::default(), &pages).is_empty());
    }

    #[test]
    fn test_pending_text_layer_skipped() {
        let mut map = pages(vec![page(1, 0.0, &["needle"])]);
        map.insert(2, MeasuredPage::pending(2, Rect::new(900.0, 10.0, 600.0, 800.0)));
        let result = locate("needle", &SearchOptions::default(), &map);
        assert_eq!(result.len(), 1);
        assert!(result.page(2).is_none());
    }

    struct Flaky {
        text: String,
        fail_at: usize,
    }

    impl TextSpan for Flaky {
        fn text(&self) -> &str {
            &self.text
        }

        fn client_rects(&self, range: Range<usize>) -> Result<Vec<Rect>, MeasureError> {
            if range.start == self.fail_at {
                return Err(MeasureError::StaleLayout { chars: 0, rects: 0 });
            }
            Ok(vec![Rect::new(0.0, range.start as f64, 1.0, 1.0)])
        }
    }

    struct FlakyPage(Vec<Flaky>);

    impl PageContainer for FlakyPage {
        type Span = Flaky;

        fn bounding_rect(&self) -> Rect {
            Rect::default()
        }

        fn text_layer(&self) -> Option<&[Flaky]> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_failed_measurement_skips_without_consuming_index() {
        let mut map = BTreeMap::new();
        map.insert(
            1,
            FlakyPage(vec![Flaky {
                text: "aa aa aa".to_string(),
                fail_at: 3,
            }]),
        );
        let result = locate("aa", &SearchOptions::default(), &map);
        assert_eq!(result.len(), 2);
        let rects = &result.highlights[0].highlights;
        assert_eq!((rects[0].left, rects[0].match_index), (0.0, 0));
        assert_eq!((rects[1].left, rects[1].match_index), (6.0, 1));
    }

    #[test]
    fn test_styled_marks_current() {
        let pages = pages(vec![page(1, 0.0, &["ab ab"])]);
        let result = locate("ab", &SearchOptions::default(), &pages);
        let kinds: Vec<HighlightKind> = result.highlights[0].styled(1).map(|(_, kind)| kind).collect();
        assert_eq!(kinds, vec![HighlightKind::Match, HighlightKind::Current]);
        assert_eq!(HighlightKind::Current.fill(), "rgba(255, 165, 0, 0.6)");
        assert_eq!(HighlightKind::Match.fill(), "rgba(255, 255, 0, 0.4)");
    }
}
