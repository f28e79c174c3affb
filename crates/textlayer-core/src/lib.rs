//! textlayer-core: PDF text-layer reconstruction and search highlighting.
//!
//! Renderer-independent types and algorithms for a PDF viewer's text layer:
//! rebuilding reading-order lines from raw positioned text, locating a query
//! in the rendered layer as highlight rectangles, and tracking the current
//! match across query, zoom, and rotation changes.
//!
//! # Architecture
//!
//! - [`normalize`]: raw fragments to reading-order fragments with inferred spaces
//! - [`viewport`] and [`layout`]: headless page geometry and text layout
//! - [`text_layer`]: the geometry seam the locator reads through
//! - [`search`]: the match locator
//! - [`session`]: search panel state, navigation, and debounced recomputes
//! - [`keys`] and [`zoom`]: viewer shortcuts and zoom steps

pub mod debounce;
pub mod error;
pub mod fragment;
pub mod geometry;
pub mod keys;
pub mod layout;
pub mod normalize;
pub mod search;
pub mod session;
pub mod text_layer;
pub mod viewport;
pub mod zoom;

pub use debounce::{Debouncer, Timestamp};
pub use error::{Error, MeasureError};
pub use fragment::{MarkedContent, RawFragment, RawTextItem, TextFragment, Transform};
pub use geometry::{BBox, Rect};
pub use keys::{Command, Key, KeyBindings, KeyContext, KeyInput, Platform};
pub use layout::{DocumentLayout, LayoutOptions, PageInput, lay_out_page};
pub use normalize::{NormalizeOptions, TextNormalizer, normalize};
pub use search::{
    HighlightKind, HighlightRect, LocateResult, PageHighlights, SearchMatch, SearchOptions, locate,
};
pub use session::{SearchSession, SearchState, SearchStatus, SessionOptions};
pub use text_layer::{MeasuredPage, MeasuredSpan, PageContainer, TextSpan};
pub use viewport::{PageViewport, Rotation};
pub use zoom::Zoom;
