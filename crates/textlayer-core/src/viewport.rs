//! Page viewport: page space to screen pixels under zoom and rotation.
//!
//! Transforms coordinates from PDF page space (bottom-left origin, points)
//! to the top-left origin pixel space of a rendered page, accounting for the
//! zoom factor and a clockwise quarter-turn rotation.

use crate::error::Error;
use crate::geometry::BBox;

/// A clockwise quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i32", into = "i32")
)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation in degrees. Any multiple of 90 is accepted and
    /// normalized into `0..360`; other values are rejected.
    pub fn from_degrees(degrees: i32) -> Result<Self, Error> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(Error::InvalidRotation(degrees)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Add two rotations, e.g. a page's inherent `/Rotate` and the user's.
    pub fn combine(self, other: Rotation) -> Rotation {
        match (self.degrees() + other.degrees()).rem_euclid(360) {
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    /// Quarter turn counter-clockwise (the viewer's rotate button).
    pub fn rotate_left(self) -> Rotation {
        self.combine(Rotation::Deg270)
    }

    /// Quarter turn clockwise.
    pub fn rotate_right(self) -> Rotation {
        self.combine(Rotation::Deg90)
    }

    /// Whether the rotation swaps the page's width and height.
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = Error;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Geometry of one rendered page.
///
/// # Example
///
/// ```
/// use textlayer_core::viewport::{PageViewport, Rotation};
///
/// // A4 page at 150% zoom, turned a quarter clockwise.
/// let vp = PageViewport::new(595.0, 842.0, 1.5, Rotation::Deg90).unwrap();
/// assert_eq!(vp.display_width(), 842.0 * 1.5);
///
/// // The page's top-left corner ends up top-right.
/// let (x, y) = vp.to_pixels(0.0, 842.0);
/// assert!((x - 842.0 * 1.5).abs() < 1e-9);
/// assert!(y.abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageViewport {
    width: f64,
    height: f64,
    scale: f64,
    rotation: Rotation,
}

impl PageViewport {
    /// Create a viewport for a page of `width` x `height` points.
    ///
    /// `scale` is a multiplier (1.0 = 100%).
    pub fn new(width: f64, height: f64, scale: f64, rotation: Rotation) -> Result<Self, Error> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidPageSize { width, height });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidScale(scale));
        }
        Ok(Self {
            width,
            height,
            scale,
            rotation,
        })
    }

    /// Unrotated page width in points.
    pub fn page_width(&self) -> f64 {
        self.width
    }

    /// Unrotated page height in points.
    pub fn page_height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Rendered width in pixels, after rotation.
    pub fn display_width(&self) -> f64 {
        if self.rotation.is_sideways() {
            self.height * self.scale
        } else {
            self.width * self.scale
        }
    }

    /// Rendered height in pixels, after rotation.
    pub fn display_height(&self) -> f64 {
        if self.rotation.is_sideways() {
            self.width * self.scale
        } else {
            self.height * self.scale
        }
    }

    /// Transform a page-space point to pixel offsets from the rendered
    /// page's top-left corner.
    pub fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        // Flip to top-left origin first, then rotate clockwise.
        let u = x;
        let v = self.height - y;
        let (ru, rv) = match self.rotation {
            Rotation::Deg0 => (u, v),
            Rotation::Deg90 => (self.height - v, u),
            Rotation::Deg180 => (self.width - u, self.height - v),
            Rotation::Deg270 => (v, self.width - u),
        };
        (ru * self.scale, rv * self.scale)
    }

    /// Pixel-space box of a page-space rectangle given by two corners.
    pub fn box_to_pixels(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> BBox {
        BBox::from_corners(self.to_pixels(x0, y0), self.to_pixels(x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4_W: f64 = 595.0;
    const A4_H: f64 = 842.0;

    fn assert_point(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0).unwrap(), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(90).unwrap(), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(45), Err(Error::InvalidRotation(45)));
    }

    #[test]
    fn rotation_turns() {
        assert_eq!(Rotation::Deg0.rotate_left(), Rotation::Deg270);
        assert_eq!(Rotation::Deg270.rotate_left(), Rotation::Deg180);
        assert_eq!(Rotation::Deg270.rotate_right(), Rotation::Deg0);
        assert_eq!(Rotation::Deg90.combine(Rotation::Deg180), Rotation::Deg270);
    }

    #[test]
    fn sideways_swaps_display_size() {
        let vp = PageViewport::new(A4_W, A4_H, 2.0, Rotation::Deg270).unwrap();
        assert_eq!(vp.display_width(), A4_H * 2.0);
        assert_eq!(vp.display_height(), A4_W * 2.0);
        let vp = PageViewport::new(A4_W, A4_H, 2.0, Rotation::Deg180).unwrap();
        assert_eq!(vp.display_width(), A4_W * 2.0);
    }

    #[test]
    fn invalid_viewports_rejected() {
        assert!(matches!(
            PageViewport::new(0.0, A4_H, 1.0, Rotation::Deg0),
            Err(Error::InvalidPageSize { .. })
        ));
        assert!(matches!(
            PageViewport::new(A4_W, f64::NAN, 1.0, Rotation::Deg0),
            Err(Error::InvalidPageSize { .. })
        ));
        assert_eq!(
            PageViewport::new(A4_W, A4_H, 0.0, Rotation::Deg0),
            Err(Error::InvalidScale(0.0))
        );
    }

    #[test]
    fn unrotated_flips_y() {
        let vp = PageViewport::new(A4_W, A4_H, 1.0, Rotation::Deg0).unwrap();
        assert_point(vp.to_pixels(72.0, 770.0), (72.0, 72.0));
    }

    #[test]
    fn scale_applies_after_flip() {
        let vp = PageViewport::new(A4_W, A4_H, 1.5, Rotation::Deg0).unwrap();
        assert_point(vp.to_pixels(100.0, 742.0), (150.0, 150.0));
    }

    #[test]
    fn corners_follow_clockwise_rotation() {
        // Page top-left corner in page space is (0, height).
        let top_left = (0.0, A4_H);
        let cases = [
            (Rotation::Deg0, (0.0, 0.0)),
            (Rotation::Deg90, (A4_H, 0.0)),
            (Rotation::Deg180, (A4_W, A4_H)),
            (Rotation::Deg270, (0.0, A4_W)),
        ];
        for (rotation, expected) in cases {
            let vp = PageViewport::new(A4_W, A4_H, 1.0, rotation).unwrap();
            assert_point(vp.to_pixels(top_left.0, top_left.1), expected);
        }
    }

    #[test]
    fn box_to_pixels_rotated_90() {
        let vp = PageViewport::new(A4_W, A4_H, 1.0, Rotation::Deg90).unwrap();
        // A 100x10 box along the top edge becomes a 10x100 box along the right edge.
        let bbox = vp.box_to_pixels(0.0, A4_H - 10.0, 100.0, A4_H);
        assert!((bbox.x0 - (A4_H - 10.0)).abs() < 1e-9);
        assert!((bbox.x1 - A4_H).abs() < 1e-9);
        assert!(bbox.top.abs() < 1e-9);
        assert!((bbox.bottom - 100.0).abs() < 1e-9);
    }
}
