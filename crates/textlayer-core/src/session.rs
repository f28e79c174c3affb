//! Search session: query, case sensitivity, active matches, and the
//! current-match pointer, with the transitions a search panel drives.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::debounce::{Debouncer, Timestamp};
use crate::keys::Command;
use crate::search::{
    HighlightKind, HighlightRect, LocateResult, PageHighlights, SearchMatch, SearchOptions, locate,
};
use crate::text_layer::PageContainer;

/// Delay between a layout change and the recompute it triggers, giving the
/// renderer time to re-lay out its text layer.
pub const RELAYOUT_DELAY: Duration = Duration::from_millis(100);

/// Panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum SearchState {
    #[default]
    Closed,
    /// Panel open, query empty.
    OpenEmpty,
    /// Panel open with a non-empty query.
    OpenSearching,
}

/// Options for a [`SearchSession`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct SessionOptions {
    /// Debounce delay for recomputes after layout or case changes.
    pub relayout_delay: Duration,
    /// Initial search options.
    pub search: SearchOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            relayout_delay: RELAYOUT_DELAY,
            search: SearchOptions::default(),
        }
    }
}

/// What the match counter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Empty query: no counter.
    Hidden,
    /// Non-empty query without matches.
    NoMatches,
    /// `current` is 1-based.
    Position { current: usize, total: usize },
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Hidden => Ok(()),
            SearchStatus::NoMatches => f.write_str("no matches"),
            SearchStatus::Position { current, total } => write!(f, "{current} / {total}"),
        }
    }
}

/// State of one search panel.
///
/// Time never advances on its own: callers pass a timestamp when something
/// schedules a recompute and call [`poll`](Self::poll) from their event loop.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use textlayer_core::geometry::Rect;
/// use textlayer_core::session::{SearchSession, SearchStatus};
/// use textlayer_core::text_layer::{MeasuredPage, MeasuredSpan};
///
/// let rects = (0..11).map(|i| Rect::new(0.0, 8.0 * i as f64, 8.0, 12.0)).collect();
/// let mut pages = BTreeMap::new();
/// pages.insert(
///     1,
///     MeasuredPage::new(1, Rect::new(0.0, 0.0, 600.0, 800.0), vec![MeasuredSpan::new("foo bar foo", rects)]),
/// );
///
/// let mut session = SearchSession::new();
/// session.open();
/// session.set_query("foo", &pages);
/// assert_eq!(session.status(), SearchStatus::Position { current: 1, total: 2 });
/// session.next();
/// session.next();
/// assert_eq!(session.current_index(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SearchSession<T = Instant> {
    state: SearchState,
    query: String,
    options: SearchOptions,
    result: LocateResult,
    current: usize,
    recompute: Debouncer<T>,
}

impl SearchSession {
    /// A closed session with default options, timed by [`Instant`].
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Timestamp> SearchSession<T> {
    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            state: SearchState::Closed,
            query: String::new(),
            options: options.search,
            result: LocateResult::default(),
            current: 0,
            recompute: Debouncer::new(options.relayout_delay),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != SearchState::Closed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn case_sensitive(&self) -> bool {
        self.options.case_sensitive
    }

    pub fn result(&self) -> &LocateResult {
        &self.result
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.result.matches
    }

    pub fn highlights(&self) -> &[PageHighlights] {
        &self.result.highlights
    }

    /// The current-match pointer (0-based).
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.result.matches.get(self.current)
    }

    /// Highlights on one page, each tagged current or not.
    pub fn page_highlights(
        &self,
        page_number: usize,
    ) -> impl Iterator<Item = (&HighlightRect, HighlightKind)> {
        self.result
            .page(page_number)
            .into_iter()
            .flat_map(|page| page.styled(self.current))
    }

    pub fn status(&self) -> SearchStatus {
        if self.query.is_empty() {
            SearchStatus::Hidden
        } else if self.result.is_empty() {
            SearchStatus::NoMatches
        } else {
            SearchStatus::Position {
                current: self.current + 1,
                total: self.result.len(),
            }
        }
    }

    /// When the pending recompute is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<T> {
        self.recompute.deadline()
    }

    /// Open the panel. No effect if already open.
    pub fn open(&mut self) {
        if self.state == SearchState::Closed {
            self.set_state(SearchState::OpenEmpty);
        }
    }

    /// Close the panel: clears query and results, resets the pointer, and
    /// drops any pending recompute.
    pub fn close(&mut self) {
        self.query.clear();
        self.result = LocateResult::default();
        self.current = 0;
        self.recompute.cancel();
        self.set_state(SearchState::Closed);
    }

    /// Empty the query and its results. An open panel stays open; a closed
    /// one stays closed.
    pub fn clear(&mut self) {
        self.query.clear();
        self.result = LocateResult::default();
        self.recompute.cancel();
        if self.is_open() {
            self.set_state(SearchState::OpenEmpty);
        }
    }

    /// Replace the query and run a locate pass immediately.
    ///
    /// The pointer resets to 0 only when the new pass finds matches. A
    /// non-empty query opens the panel if it was closed. Any pending recompute is dropped since
    /// this pass already reflects the current layout.
    pub fn set_query<C: PageContainer>(&mut self, query: &str, pages: &BTreeMap<usize, C>) {
        if query.is_empty() {
            self.clear();
            return;
        }
        self.query = query.to_string();
        self.recompute.cancel();
        self.result = locate(&self.query, &self.options, pages);
        if !self.result.is_empty() {
            self.current = 0;
        }
        self.set_state(SearchState::OpenSearching);
    }

    /// Change case sensitivity. An active search is recomputed after the
    /// relayout delay.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool, now: T) {
        if self.options.case_sensitive == case_sensitive {
            return;
        }
        self.options.case_sensitive = case_sensitive;
        self.schedule(now);
    }

    pub fn toggle_case_sensitive(&mut self, now: T) {
        self.set_case_sensitive(!self.options.case_sensitive, now);
    }

    /// Page mount, zoom, or rotation changed. An active search is
    /// recomputed after the relayout delay.
    pub fn layout_changed(&mut self, now: T) {
        self.schedule(now);
    }

    fn schedule(&mut self, now: T) {
        if self.state == SearchState::OpenSearching {
            self.recompute.schedule(now);
        }
    }

    /// Run the pending recompute if it is due. Returns whether it ran.
    pub fn poll<C: PageContainer>(&mut self, now: T, pages: &BTreeMap<usize, C>) -> bool {
        if !self.recompute.fire(now) || self.state != SearchState::OpenSearching {
            return false;
        }
        self.relocate(pages);
        true
    }

    /// Re-run the current query against fresh geometry, keeping the
    /// pointer. If fewer matches remain, the pointer moves to the last one.
    pub fn relocate<C: PageContainer>(&mut self, pages: &BTreeMap<usize, C>) {
        if self.query.is_empty() {
            return;
        }
        self.result = locate(&self.query, &self.options, pages);
        let total = self.result.len();
        if total > 0 && self.current >= total {
            self.current = total - 1;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(total, current = self.current, "recomputed matches");
    }

    /// Advance to the next match, wrapping to the first.
    pub fn next(&mut self) -> Option<usize> {
        let total = self.result.len();
        if total == 0 {
            return None;
        }
        self.current = (self.current + 1) % total;
        Some(self.current)
    }

    /// Step back to the previous match, wrapping to the last.
    pub fn previous(&mut self) -> Option<usize> {
        let total = self.result.len();
        if total == 0 {
            return None;
        }
        self.current = (self.current + total - 1) % total;
        Some(self.current)
    }

    /// Jump to match `index` (0-based). Returns `false` if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.result.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Apply a resolved key command. Returns `false` for commands the
    /// session does not handle (zoom).
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::OpenSearch => self.open(),
            Command::CloseSearch => self.close(),
            Command::NextMatch => {
                self.next();
            }
            Command::PreviousMatch => {
                self.previous();
            }
            Command::ZoomIn | Command::ZoomOut => return false,
        }
        true
    }

    fn set_state(&mut self, state: SearchState) {
        #[cfg(feature = "tracing")]
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "search state changed");
        }
        self.state = state;
    }
}
