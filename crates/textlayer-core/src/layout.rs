//! Headless text layer layout.
//!
//! Positions normalized fragments the way a renderer's text layer would:
//! each fragment becomes one span, its advance split evenly across its
//! characters, projected through the page viewport. Pages are stacked
//! vertically like a continuous-scroll viewer.

use std::collections::BTreeMap;

use crate::fragment::TextFragment;
use crate::geometry::Rect;
use crate::text_layer::{MeasuredPage, MeasuredSpan};
use crate::viewport::PageViewport;

/// Options for stacking pages into a document view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct LayoutOptions {
    /// Vertical space between consecutive pages, in pixels.
    pub page_gap: f64,
    /// Space above the first page and left of every page, in pixels.
    pub margin: f64,
    /// How far the document is scrolled down, in pixels.
    pub scroll_top: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_gap: 8.0,
            margin: 4.0,
            scroll_top: 0.0,
        }
    }
}

/// Lay out one page's fragments as measured spans.
///
/// `origin` is the client position `(left, top)` of the page container.
pub fn lay_out_page(
    fragments: &[TextFragment],
    viewport: &PageViewport,
    origin: (f64, f64),
) -> Vec<MeasuredSpan> {
    fragments
        .iter()
        .map(|fragment| lay_out_fragment(fragment, viewport, origin))
        .collect()
}

fn lay_out_fragment(
    fragment: &TextFragment,
    viewport: &PageViewport,
    (left, top): (f64, f64),
) -> MeasuredSpan {
    let count = fragment.text.chars().count();
    let ascent = match fragment.font_height() {
        h if h > 0.0 => h,
        _ => fragment.height,
    };
    let x = fragment.x();
    let y = fragment.y();
    let advance = fragment.width / count.max(1) as f64;

    let char_rects = (0..count)
        .map(|i| {
            let x0 = x + advance * i as f64;
            viewport
                .box_to_pixels(x0, y, x0 + advance, y + ascent)
                .to_rect()
                .translate(left, top)
        })
        .collect();

    MeasuredSpan::new(fragment.text.clone(), char_rects)
}

/// One page to place in a [`DocumentLayout`].
#[derive(Debug, Clone, Copy)]
pub struct PageInput<'a> {
    pub page_number: usize,
    pub viewport: PageViewport,
    /// Normalized fragments; `None` while the text layer is still pending.
    pub fragments: Option<&'a [TextFragment]>,
}

/// Stacks pages top to bottom and lays out their text layers.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    options: LayoutOptions,
}

impl DocumentLayout {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Container rectangles for pages of the given display sizes, in order.
    pub fn containers(&self, sizes: impl IntoIterator<Item = (f64, f64)>) -> Vec<Rect> {
        let mut top = self.options.margin - self.options.scroll_top;
        sizes
            .into_iter()
            .map(|(width, height)| {
                let rect = Rect::new(top, self.options.margin, width, height);
                top += height + self.options.page_gap;
                rect
            })
            .collect()
    }

    /// Lay out every page, keyed by page number.
    ///
    /// Pages are stacked in the order given.
    pub fn lay_out<'a>(
        &self,
        pages: impl IntoIterator<Item = PageInput<'a>>,
    ) -> BTreeMap<usize, MeasuredPage> {
        let pages: Vec<PageInput<'a>> = pages.into_iter().collect();
        let containers = self.containers(
            pages
                .iter()
                .map(|p| (p.viewport.display_width(), p.viewport.display_height())),
        );

        pages
            .iter()
            .zip(containers)
            .map(|(page, container)| {
                let text_layer = page
                    .fragments
                    .map(|fragments| lay_out_page(fragments, &page.viewport, (container.left, container.top)));
                let measured = MeasuredPage {
                    page_number: page.page_number,
                    container,
                    text_layer,
                };
                (page.page_number, measured)
            })
            .collect()
    }
}
