//! Coordinate-space aware points and rectangles.
//!
//! Two coordinate systems are in play while cropping a ticket:
//!
//! - [`ImageSpace`]: pixel coordinates of the decoded source image
//! - [`DisplaySpace`]: viewport coordinates after fit-to-view scaling
//!
//! Points and rectangles carry their space as a zero-sized type parameter so
//! the compiler rejects mixing the two. Conversion between spaces goes
//! through [`crate::transform::Transform`].
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner
//! - X grows to the right, Y grows downward

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Marker for pixel coordinates of the original decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSpace;

/// Marker for on-screen viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySpace;

/// A 2D point tagged with its coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<S> {
    pub x: f64,
    pub y: f64,
    space: PhantomData<S>,
}

impl<S> Point<S> {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }
}

/// An axis-aligned rectangle tagged with its coordinate space.
///
/// Rectangles are immutable values: every operation returns a new rectangle.
/// Width and height are never negative; a rectangle with zero width or
/// height is considered empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<S> {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    space: PhantomData<S>,
}

/// Rectangle in source image pixels.
pub type ImageRect = Rect<ImageSpace>;
/// Rectangle in viewport coordinates.
pub type DisplayRect = Rect<DisplaySpace>;
/// Point in source image pixels.
pub type ImagePoint = Point<ImageSpace>;
/// Point in viewport coordinates.
pub type DisplayPoint = Point<DisplaySpace>;

impl<S> Rect<S> {
    /// Create a rectangle from its top-left corner and size.
    ///
    /// Negative sizes are clamped to zero.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
            space: PhantomData,
        }
    }

    /// Create a rectangle spanning two arbitrary corners.
    ///
    /// Coordinates are swapped as needed so that left <= right and
    /// top <= bottom.
    pub fn from_corners(a: Point<S>, b: Point<S>) -> Self {
        Self::from_edges(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Create a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.top
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn top_left(&self) -> Point<S> {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point<S> {
        Point::new(self.right(), self.bottom())
    }

    /// Zero-area rectangles are empty and never committable.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rectangle enclosing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn pad(&self, margin: f64) -> Self {
        Self::from_edges(
            self.left - margin,
            self.top - margin,
            self.right() + margin,
            self.bottom() + margin,
        )
    }

    /// Intersect with the rectangle (0, 0)-(max_x, max_y).
    pub fn clamp_to(&self, max_x: f64, max_y: f64) -> Self {
        Self::from_edges(
            self.left.clamp(0.0, max_x),
            self.top.clamp(0.0, max_y),
            self.right().clamp(0.0, max_x),
            self.bottom().clamp(0.0, max_y),
        )
    }

    /// Whether `other` lies fully inside this rectangle.
    pub fn contains(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl<S> fmt::Display for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1})-({:.1}, {:.1})",
            self.left,
            self.top,
            self.right(),
            self.bottom()
        )
    }
}

/// Integer pixel region inside a concrete image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// One past the last column, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row, saturating at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

impl ImageRect {
    /// Snap to whole pixels and clamp to an image of the given size.
    ///
    /// Edges are floored, left/top are floored at 0 and right/bottom are
    /// capped at the image size. Returns `None` when nothing of the
    /// rectangle remains inside the image.
    pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        let x1 = self.left.floor().max(0.0);
        let y1 = self.top.floor().max(0.0);
        let x2 = self.right().floor().min(image_width as f64);
        let y2 = self.bottom().floor().min(image_height as f64);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(PixelRect {
            x: x1 as u32,
            y: y1 as u32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }
}
