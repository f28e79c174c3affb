//! Positioned text fragments as produced by a PDF renderer's text-content API.
//!
//! Field names follow the renderer's item shape when the `serde` feature is
//! enabled (`str`, `hasEOL`, `fontName`), so text content dumps can be fed
//! through unchanged.

/// A 2D affine transform `[a, b, c, d, e, f]`. `(e, f)` is the fragment origin
/// in page space (bottom-left origin, y increasing upward).
pub type Transform = [f64; 6];

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextFragment {
    /// The text content.
    #[cfg_attr(feature = "serde", serde(rename = "str"))]
    pub text: String,
    /// Advance width in page-space units.
    pub width: f64,
    /// Height reported by the renderer (zero for many whitespace items).
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: f64,
    /// Text matrix; `transform[4]` is x, `transform[5]` is y.
    pub transform: Transform,
    /// Whether this fragment ends its line.
    #[cfg_attr(feature = "serde", serde(rename = "hasEOL", default))]
    pub line_terminal: bool,
    /// Renderer font identifier, passed through untouched.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "fontName",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub font_name: Option<String>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, width: f64, transform: Transform) -> Self {
        Self {
            text: text.into(),
            width,
            height: 0.0,
            transform,
            line_terminal: false,
            font_name: None,
        }
    }

    /// Set the reported height (builder style).
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set the font name (builder style).
    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// Horizontal origin in page space.
    pub fn x(&self) -> f64 {
        self.transform[4]
    }

    /// Baseline position in page space.
    pub fn y(&self) -> f64 {
        self.transform[5]
    }

    /// Right edge of the fragment's advance.
    pub fn end_x(&self) -> f64 {
        self.x() + self.width
    }

    /// Vertical extent of the glyphs, derived from the text matrix.
    pub fn font_height(&self) -> f64 {
        self.transform[2].hypot(self.transform[3])
    }

    /// True if the text is empty after trimming whitespace.
    pub fn is_whitespace_only(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// A single-space fragment filling `gap` units after `self`.
    ///
    /// Keeps the scale/skew components and baseline of `self`; only the
    /// origin moves to `self`'s right edge.
    pub(crate) fn space_after(&self, gap: f64) -> TextFragment {
        let [a, b, c, d, _, f] = self.transform;
        TextFragment {
            text: " ".to_string(),
            width: gap,
            height: self.height,
            transform: [a, b, c, d, self.end_x(), f],
            line_terminal: false,
            font_name: self.font_name.clone(),
        }
    }
}

/// Marker for a marked-content sequence boundary. Carries no text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkedContent {
    /// Marker kind, e.g. `beginMarkedContent`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
}

/// A text item as delivered by the renderer, before validation.
///
/// Every geometric field is optional: renderers occasionally emit items with
/// missing fields, and those are dropped during normalization.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTextItem {
    #[cfg_attr(feature = "serde", serde(rename = "str", default))]
    pub text: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub transform: Option<Transform>,
    #[cfg_attr(feature = "serde", serde(rename = "hasEOL", default))]
    pub has_eol: bool,
    #[cfg_attr(feature = "serde", serde(rename = "fontName", default))]
    pub font_name: Option<String>,
}

impl RawTextItem {
    /// Validate into a [`TextFragment`].
    ///
    /// Returns `None` when text, width, or transform is missing, or when any
    /// number is not finite.
    pub fn to_fragment(&self) -> Option<TextFragment> {
        let text = self.text.as_ref()?;
        let width = self.width?;
        let transform = self.transform?;
        if !width.is_finite() || transform.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let height = self.height.filter(|h| h.is_finite()).unwrap_or(0.0);
        Some(TextFragment {
            text: text.clone(),
            width,
            height,
            transform,
            line_terminal: self.has_eol,
            font_name: self.font_name.clone(),
        })
    }
}

/// One entry of a page's raw text content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum RawFragment {
    /// Structural marker; always dropped by the normalizer.
    MarkedContent(MarkedContent),
    /// Positioned text, possibly malformed.
    Text(RawTextItem),
}

impl From<TextFragment> for RawFragment {
    fn from(fragment: TextFragment) -> Self {
        RawFragment::Text(RawTextItem {
            text: Some(fragment.text),
            width: Some(fragment.width),
            height: Some(fragment.height),
            transform: Some(fragment.transform),
            has_eol: fragment.line_terminal,
            font_name: fragment.font_name,
        })
    }
}
