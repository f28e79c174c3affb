/// Axis-aligned box with top-left origin coordinates, in pixels.
///
/// Used internally while transforming glyph boxes between page space and
/// screen space:
/// - `x0`: left edge
/// - `top`: top edge
/// - `x1`: right edge
/// - `bottom`: bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Smallest box containing both points, whatever their order.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            top: a.1.min(b.1),
            x1: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.top, self.x0, self.width(), self.height())
    }
}

/// A client rectangle in the shape layout engines report them:
/// top/left offsets plus extent, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Shift the rectangle by the given offsets.
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            top: self.top + dy,
            left: self.left + dx,
            ..*self
        }
    }

    pub fn to_bbox(&self) -> BBox {
        BBox::new(self.left, self.top, self.right(), self.bottom())
    }
}
