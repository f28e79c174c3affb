//! WebAssembly/JavaScript bindings for textlayer-core.
//!
//! Normalizes pdf.js text content and runs a search session over text-layer
//! geometry measured by the browser. Complex values cross the boundary as
//! plain JS objects via serde_wasm_bindgen.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use textlayer_core::normalize::page_text;
use textlayer_core::{
    Command, HighlightKind, Key, KeyBindings, KeyContext, KeyInput, MeasuredPage, Platform, RawFragment,
    SearchSession, SearchState, SessionOptions, Zoom, normalize,
};

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Milliseconds from `performance.now()` as a monotonic timestamp.
fn timestamp(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or_default()
}

/// Normalize one page's `getTextContent().items` into reading order.
///
/// ```js
/// const { items } = await page.getTextContent();
/// const fragments = normalizeTextItems(items);
/// ```
#[wasm_bindgen(js_name = "normalizeTextItems")]
pub fn normalize_text_items(items: JsValue) -> Result<JsValue, JsError> {
    let items: Vec<RawFragment> = serde_wasm_bindgen::from_value(items).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&normalize(&items)).map_err(js_error)
}

/// Reconstructed plain text of one page's text content items.
#[wasm_bindgen(js_name = "pageText")]
pub fn page_text_of(items: JsValue) -> Result<String, JsError> {
    let items: Vec<RawFragment> = serde_wasm_bindgen::from_value(items).map_err(js_error)?;
    Ok(page_text(&normalize(&items)))
}

/// Zoom one step in from `percent`.
#[wasm_bindgen(js_name = "zoomIn")]
pub fn zoom_in(percent: i32) -> u32 {
    Zoom::new(i64::from(percent)).zoom_in().percent()
}

/// Zoom one step out from `percent`.
#[wasm_bindgen(js_name = "zoomOut")]
pub fn zoom_out(percent: i32) -> u32 {
    Zoom::new(i64::from(percent)).zoom_out().percent()
}

/// Zoom for a modifier + wheel event.
#[wasm_bindgen(js_name = "wheelZoom")]
pub fn wheel_zoom(percent: i32, delta_y: f64) -> u32 {
    Zoom::new(i64::from(percent)).wheel(delta_y).percent()
}

/// Zoom that fits the most visible page to the scroll container's height.
/// `undefined` while the page has no rendered height.
#[wasm_bindgen(js_name = "fitHeight")]
pub fn fit_height(
    percent: i32,
    rendered_height: f64,
    container_height: f64,
    padding: f64,
) -> Option<u32> {
    Zoom::new(i64::from(percent))
        .fit_height(rendered_height, container_height, padding)
        .map(Zoom::percent)
}

/// A highlight rectangle with its styling, as handed to JS.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct StyledHighlight {
    page_number: usize,
    match_index: usize,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    current: bool,
    fill: &'static str,
}

/// A search panel session (WASM binding).
///
/// # JavaScript Usage
///
/// ```js
/// const session = new WasmSearchSession(navigator.userAgent);
/// session.setPages(measurePages());
/// session.setQuery("foo");
/// console.log(session.status); // "1 / 3"
/// // after zoom or rotation:
/// session.setPages(measurePages());
/// session.layoutChanged(performance.now());
/// setTimeout(() => session.poll(performance.now()), 100);
/// ```
#[wasm_bindgen]
pub struct WasmSearchSession {
    inner: SearchSession<Duration>,
    pages: BTreeMap<usize, MeasuredPage>,
    keys: KeyBindings,
}

#[wasm_bindgen]
impl WasmSearchSession {
    /// Create a closed session. `userAgent` picks Cmd or Ctrl as the
    /// shortcut modifier; `relayoutDelayMs` defaults to 100.
    #[wasm_bindgen(constructor)]
    pub fn new(user_agent: Option<String>, relayout_delay_ms: Option<f64>) -> WasmSearchSession {
        let platform = user_agent
            .as_deref()
            .map(Platform::from_user_agent)
            .unwrap_or_default();
        let mut options = SessionOptions::default();
        if let Some(ms) = relayout_delay_ms {
            options.relayout_delay = timestamp(ms);
        }
        WasmSearchSession {
            inner: SearchSession::with_options(options),
            pages: BTreeMap::new(),
            keys: KeyBindings::new(platform),
        }
    }

    /// Replace the mounted pages with a fresh measurement
    /// (`Array<{pageNumber, container, textLayer}>`).
    #[wasm_bindgen(js_name = "setPages")]
    pub fn set_pages(&mut self, pages: JsValue) -> Result<(), JsError> {
        let pages: Vec<MeasuredPage> = serde_wasm_bindgen::from_value(pages).map_err(js_error)?;
        self.replace_pages(pages);
        Ok(())
    }

    /// Add or replace one mounted page.
    #[wasm_bindgen(js_name = "mountPage")]
    pub fn mount_page(&mut self, page: JsValue) -> Result<(), JsError> {
        let page: MeasuredPage = serde_wasm_bindgen::from_value(page).map_err(js_error)?;
        self.pages.insert(page.page_number, page);
        Ok(())
    }

    #[wasm_bindgen(js_name = "unmountPage")]
    pub fn unmount_page(&mut self, page_number: usize) {
        self.pages.remove(&page_number);
    }

    pub fn open(&mut self) {
        self.inner.open();
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(js_name = "setQuery")]
    pub fn set_query(&mut self, query: &str) {
        self.inner.set_query(query, &self.pages);
    }

    #[wasm_bindgen(js_name = "setCaseSensitive")]
    pub fn set_case_sensitive(&mut self, case_sensitive: bool, now_ms: f64) {
        self.inner.set_case_sensitive(case_sensitive, timestamp(now_ms));
    }

    /// Report a zoom, rotation, or mount change; schedules a recompute.
    #[wasm_bindgen(js_name = "layoutChanged")]
    pub fn layout_changed(&mut self, now_ms: f64) {
        self.inner.layout_changed(timestamp(now_ms));
    }

    /// Run a due recompute. Returns whether highlights changed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        self.inner.poll(timestamp(now_ms), &self.pages)
    }

    /// Milliseconds timestamp of the pending recompute, if any.
    #[wasm_bindgen(js_name = "nextDeadline")]
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner
            .next_deadline()
            .map(|deadline| deadline.as_nanos() as f64 / 1_000_000.0)
    }

    pub fn next(&mut self) -> Option<usize> {
        self.inner.next()
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.inner.previous()
    }

    /// Handle a keydown. Search commands are applied to the session; the
    /// command name is returned so the caller can prevent the default
    /// action and apply zoom commands itself.
    #[wasm_bindgen(js_name = "handleKey")]
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        meta: bool,
        single_document: bool,
    ) -> Option<String> {
        let key = parse_key(key)?;
        let input = KeyInput {
            key,
            shift,
            ctrl,
            meta,
        };
        let context = KeyContext {
            search_open: self.inner.is_open(),
            single_document,
        };
        let command = self.keys.resolve(&input, &context)?;
        self.inner.apply(command);
        Some(command_name(command).to_string())
    }

    /// `"closed"`, `"openEmpty"`, or `"openSearching"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            SearchState::Closed => "closed",
            SearchState::OpenEmpty => "openEmpty",
            SearchState::OpenSearching => "openSearching",
        }
        .to_string()
    }

    /// Counter text: empty, `"no matches"`, or `"current / total"`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.inner.status().to_string()
    }

    #[wasm_bindgen(getter, js_name = "currentIndex")]
    pub fn current_index(&self) -> usize {
        self.inner.current_index()
    }

    #[wasm_bindgen(getter, js_name = "matchCount")]
    pub fn match_count(&self) -> usize {
        self.inner.matches().len()
    }

    #[wasm_bindgen(getter, js_name = "caseSensitive")]
    pub fn case_sensitive(&self) -> bool {
        self.inner.case_sensitive()
    }

    /// All highlight rectangles with `current` flag and fill color.
    pub fn highlights(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.styled_highlights()).map_err(js_error)
    }

    /// The ordered match list (`Array<{pageNumber, matchIndex}>`).
    pub fn matches(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.inner.matches()).map_err(js_error)
    }
}

impl WasmSearchSession {
    fn replace_pages(&mut self, pages: Vec<MeasuredPage>) {
        self.pages = pages
            .into_iter()
            .map(|page| (page.page_number, page))
            .collect();
    }

    fn styled_highlights(&self) -> Vec<StyledHighlight> {
        self.inner
            .highlights()
            .iter()
            .flat_map(|page| {
                self.inner
                    .page_highlights(page.page_number)
                    .map(move |(rect, kind)| StyledHighlight {
                        page_number: page.page_number,
                        match_index: rect.match_index,
                        top: rect.top,
                        left: rect.left,
                        width: rect.width,
                        height: rect.height,
                        current: kind == HighlightKind::Current,
                        fill: kind.fill(),
                    })
            })
            .collect()
    }
}

/// Map a `KeyboardEvent.key` value.
fn parse_key(key: &str) -> Option<Key> {
    match key {
        "Enter" => Some(Key::Enter),
        "Escape" => Some(Key::Escape),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
    }
}

fn command_name(command: Command) -> &'static str {
    match command {
        Command::OpenSearch => "openSearch",
        Command::CloseSearch => "closeSearch",
        Command::NextMatch => "nextMatch",
        Command::PreviousMatch => "previousMatch",
        Command::ZoomIn => "zoomIn",
        Command::ZoomOut => "zoomOut",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textlayer_core::{MeasuredSpan, Rect, TextFragment};

    // JsValue conversions need a JS runtime, so these tests drive the
    // session through its Rust-side helpers.

    fn page(number: usize, top: f64, text: &str) -> MeasuredPage {
        let rects = (0..text.chars().count())
            .map(|i| Rect::new(top + 30.0, 20.0 + 8.0 * i as f64, 8.0, 12.0))
            .collect();
        MeasuredPage::new(
            number,
            Rect::new(top, 4.0, 600.0, 800.0),
            vec![MeasuredSpan::new(text, rects)],
        )
    }

    fn session_with(pages: Vec<MeasuredPage>) -> WasmSearchSession {
        let mut session =
            WasmSearchSession::new(Some("Mozilla/5.0 (X11; Linux x86_64)".into()), None);
        session.replace_pages(pages);
        session
    }

    #[test]
    fn test_timestamp_guards_bad_input() {
        assert_eq!(timestamp(1500.0), Duration::from_millis(1500));
        assert_eq!(timestamp(-5.0), Duration::ZERO);
        assert_eq!(timestamp(f64::NAN), Duration::ZERO);
        assert_eq!(timestamp(f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn test_query_and_navigation() {
        let mut session = session_with(vec![page(1, 0.0, "foo bar foo"), page(2, 808.0, "foo")]);
        session.open();
        session.set_query("foo");
        assert_eq!(session.state(), "openSearching");
        assert_eq!(session.status(), "1 / 3");
        assert_eq!(session.previous(), Some(2));
        assert_eq!(session.next(), Some(0));
        assert_eq!(session.match_count(), 3);
    }

    #[test]
    fn test_styled_highlights_are_page_relative() {
        let mut session = session_with(vec![page(1, 0.0, "ab"), page(2, 808.0, "xab")]);
        session.set_query("ab");
        session.next();
        let styled = session.styled_highlights();
        assert_eq!(styled.len(), 2);
        assert_eq!(
            styled[1],
            StyledHighlight {
                page_number: 2,
                match_index: 1,
                top: 30.0,
                left: 24.0,
                width: 16.0,
                height: 12.0,
                current: true,
                fill: "rgba(255, 165, 0, 0.6)",
            }
        );
        assert!(!styled[0].current);
    }

    #[test]
    fn test_relayout_after_mount() {
        let mut session = session_with(vec![page(1, 0.0, "needle")]);
        session.set_query("needle");
        assert_eq!(session.match_count(), 1);

        session.pages.insert(2, page(2, 808.0, "needle"));
        session.layout_changed(1000.0);
        assert_eq!(session.next_deadline(), Some(1100.0));
        assert!(!session.poll(1050.0));
        assert!(session.poll(1100.0));
        assert_eq!(session.match_count(), 2);
        session.unmount_page(2);
        assert_eq!(session.pages.len(), 1);
    }

    #[test]
    fn test_handle_key() {
        let mut session = session_with(vec![page(1, 0.0, "a a")]);
        assert_eq!(
            session.handle_key("f", false, true, false, true).as_deref(),
            Some("openSearch")
        );
        session.set_query("a");
        assert_eq!(
            session.handle_key("Enter", false, false, false, true).as_deref(),
            Some("nextMatch")
        );
        assert_eq!(session.current_index(), 1);
        assert_eq!(
            session.handle_key("-", false, true, false, true).as_deref(),
            Some("zoomOut")
        );
        assert_eq!(session.handle_key("ArrowUp", false, false, false, true), None);
        assert_eq!(
            session.handle_key("Escape", false, false, false, true).as_deref(),
            Some("closeSearch")
        );
        assert_eq!(session.state(), "closed");
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_zoom_exports() {
        assert_eq!(zoom_in(100), 125);
        assert_eq!(zoom_out(100), 75);
        assert_eq!(wheel_zoom(100, -1.0), 110);
        assert_eq!(zoom_in(9000), 500);
        assert_eq!(fit_height(100, 842.0, 1000.0, 16.0), Some(116));
        assert_eq!(fit_height(100, 0.0, 1000.0, 16.0), None);
    }

    #[test]
    fn test_case_toggle_is_debounced() {
        let mut session = session_with(vec![page(1, 0.0, "Foo foo")]);
        session.set_query("foo");
        session.set_case_sensitive(true, 0.0);
        assert!(session.case_sensitive());
        assert_eq!(session.match_count(), 2);
        assert!(session.poll(100.0));
        assert_eq!(session.match_count(), 1);
    }

    #[test]
    fn test_underlying_normalize() {
        let items: Vec<RawFragment> = vec![
            TextFragment::new("Saksnummer:", 71.652, [12.0, 0.0, 0.0, 12.0, 56.7, 620.0])
                .with_height(12.0)
                .into(),
            TextFragment::new("1829", 23.856, [12.0, 0.0, 0.0, 12.0, 130.76, 620.0])
                .with_height(12.0)
                .into(),
        ];
        assert_eq!(page_text(&normalize(&items)), "Saksnummer: 1829");
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("Enter"), Some(Key::Enter));
        assert_eq!(parse_key("+"), Some(Key::Char('+')));
        assert_eq!(parse_key("Shift"), None);
    }
}
