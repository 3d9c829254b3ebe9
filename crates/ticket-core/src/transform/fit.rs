//! Fit-to-view affine mapping between image and display space.

use crate::geometry::{DisplayPoint, DisplayRect, ImagePoint, ImageRect, Point, Rect};

/// Affine map from [`ImageSpace`](crate::geometry::ImageSpace) to
/// [`DisplaySpace`](crate::geometry::DisplaySpace).
///
/// `display = image * scale + offset` per axis. Scales are always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Transform {
    /// Build a transform from explicit parameters.
    ///
    /// Returns `None` if either scale is not a positive finite number.
    pub fn new(scale_x: f64, scale_y: f64, offset_x: f64, offset_y: f64) -> Option<Self> {
        let valid = |s: f64| s.is_finite() && s > 0.0;
        if !valid(scale_x) || !valid(scale_y) {
            return None;
        }
        Some(Self {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        })
    }

    /// The identity mapping (display space equals image space).
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Fit an image into a viewport, preserving aspect ratio and centering.
    ///
    /// The image is scaled uniformly so that it fits entirely inside the
    /// viewport; the leftover space is split evenly on both sides. Offsets
    /// are never negative.
    ///
    /// Returns `None` when the image or the viewport has no area, i.e. when
    /// nothing can be displayed.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        if !(viewport_width > 0.0 && viewport_height > 0.0) {
            return None;
        }

        let iw = image_width as f64;
        let ih = image_height as f64;
        let scale = (viewport_width / iw).min(viewport_height / ih);

        let offset_x = ((viewport_width - iw * scale) / 2.0).max(0.0);
        let offset_y = ((viewport_height - ih * scale) / 2.0).max(0.0);

        Self::new(scale, scale, offset_x, offset_y)
    }

    pub fn point_to_display(&self, p: ImagePoint) -> DisplayPoint {
        Point::new(
            p.x * self.scale_x + self.offset_x,
            p.y * self.scale_y + self.offset_y,
        )
    }

    pub fn point_to_image(&self, p: DisplayPoint) -> ImagePoint {
        Point::new(
            (p.x - self.offset_x) / self.scale_x,
            (p.y - self.offset_y) / self.scale_y,
        )
    }

    pub fn rect_to_display(&self, r: &ImageRect) -> DisplayRect {
        Rect::from_corners(
            self.point_to_display(r.top_left()),
            self.point_to_display(r.bottom_right()),
        )
    }

    pub fn rect_to_image(&self, r: &DisplayRect) -> ImageRect {
        Rect::from_corners(
            self.point_to_image(r.top_left()),
            self.point_to_image(r.bottom_right()),
        )
    }
}
