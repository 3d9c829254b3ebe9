//! Automatic ticket region detection.
//!
//! The detector assumes a single roughly rectangular, high-contrast ticket
//! on a mostly uniform background. It is a deterministic single pass with no
//! learned parameters:
//!
//! 1. Convert to single-channel intensity
//! 2. Gaussian blur to suppress scan noise
//! 3. Canny edge detection
//! 4. Morphological close to bridge broken contour segments
//! 5. External contours (holes ignored) and their bounding boxes
//! 6. Drop boxes lying entirely in the right-hand artifact margin
//! 7. Union of the survivors, padded
//!
//! Printed text commonly breaks a ticket into several disjoint contours, so
//! all surviving boxes are merged instead of picking the largest one.

mod config;

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

use crate::decode::DecodedImage;
use crate::geometry::ImageRect;
use crate::luminance::to_intensity;

pub use config::DetectorConfig;

/// Images narrower or shorter than this cannot hold a ticket outline.
const MIN_DIMENSION: u32 = 3;

/// Finds the candidate ticket rectangle in a scan.
#[derive(Debug, Clone, Default)]
pub struct RegionDetector {
    config: DetectorConfig,
}

impl RegionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect the ticket region in image pixel coordinates.
    ///
    /// Returns `None` when no contour survives filtering, e.g. for a blank
    /// scan. The caller then starts with an empty selection.
    pub fn detect(&self, image: &DecodedImage) -> Option<ImageRect> {
        if image.is_empty() || image.width < MIN_DIMENSION || image.height < MIN_DIMENSION {
            return None;
        }

        let gray = to_intensity(image);
        let closed = self.edge_map(&gray);
        let boxes = external_boxes(&closed);
        log::debug!("Found {} external contours", boxes.len());

        let kept = filter_artifacts(boxes, image.width, self.config.margin_fraction);
        let Some(union) = merge(&kept) else {
            log::info!("No ticket region detected");
            return None;
        };

        let mut region = union.pad(self.config.padding);
        if self.config.clamp_to_image {
            region = region.clamp_to(image.width as f64, image.height as f64);
        }

        log::info!(
            "Detected ticket region {} from {} contour(s)",
            region,
            kept.len()
        );
        Some(region)
    }

    /// Blur, Canny and close: a binary map where 255 marks edge pixels.
    fn edge_map(&self, gray: &GrayImage) -> GrayImage {
        let blurred = if self.config.blur_sigma > 0.0 {
            gaussian_blur_f32(gray, self.config.blur_sigma)
        } else {
            gray.clone()
        };

        let edges = canny(
            &blurred,
            self.config.low_threshold,
            self.config.high_threshold,
        );

        if self.config.close_radius == 0 {
            edges
        } else {
            close(&edges, Norm::LInf, self.config.close_radius)
        }
    }
}

/// Bounding boxes of the outermost contours of a binary map.
fn external_boxes(binary: &GrayImage) -> Vec<ImageRect> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let xs = c.points.iter().map(|p| p.x);
            let ys = c.points.iter().map(|p| p.y);
            let (min_x, max_x) = (xs.clone().min()?, xs.max()?);
            let (min_y, max_y) = (ys.clone().min()?, ys.max()?);
            // Contour points are pixel centres, the box covers whole pixels
            Some(ImageRect::from_edges(
                min_x as f64,
                min_y as f64,
                (max_x + 1) as f64,
                (max_y + 1) as f64,
            ))
        })
        .collect()
}

/// Drop boxes that lie entirely inside the rightmost `margin_fraction` of
/// the image width, where scanner-bed edges reliably show up.
fn filter_artifacts(boxes: Vec<ImageRect>, image_width: u32, margin_fraction: f64) -> Vec<ImageRect> {
    let width = image_width as f64;
    let boundary = width - (width * margin_fraction).floor();

    boxes
        .into_iter()
        .filter(|b| {
            let in_margin = b.right() > boundary && b.left() >= boundary;
            if in_margin {
                log::debug!("Discarding margin artifact {}", b);
            }
            !in_margin
        })
        .collect()
}

fn merge(boxes: &[ImageRect]) -> Option<ImageRect> {
    boxes.iter().copied().reduce(|acc, b| acc.union(&b))
}
