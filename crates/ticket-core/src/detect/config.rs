//! Tuning parameters for ticket region detection.

use serde::{Deserialize, Serialize};

/// Configuration for [`RegionDetector`](super::RegionDetector).
///
/// The defaults are tuned for flatbed scans of paper tickets on a dark or
/// uniform lid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Standard deviation of the pre-edge Gaussian blur.
    ///
    /// 1.1 is the sigma of a 5x5 Gaussian kernel.
    pub blur_sigma: f32,

    /// Canny hysteresis low threshold.
    pub low_threshold: f32,

    /// Canny hysteresis high threshold.
    pub high_threshold: f32,

    /// Radius of the square closing element (2 gives a 5x5 square).
    pub close_radius: u8,

    /// Fraction of the image width, measured from the right edge, where
    /// scanner-bed artifacts show up. Boxes lying entirely inside it are
    /// dropped.
    pub margin_fraction: f64,

    /// Pixels added on every side of the merged region.
    pub padding: f64,

    /// Clamp the padded region to the image bounds.
    pub clamp_to_image: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            low_threshold: 100.0,
            high_threshold: 250.0,
            close_radius: 2,
            margin_fraction: 0.45,
            padding: 10.0,
            clamp_to_image: false,
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_blur_sigma(mut self, sigma: f32) -> Self {
        self.blur_sigma = sigma;
        self
    }

    /// Set both Canny thresholds.
    pub fn set_thresholds(mut self, low: f32, high: f32) -> Self {
        self.low_threshold = low;
        self.high_threshold = high;
        self
    }

    pub fn set_close_radius(mut self, radius: u8) -> Self {
        self.close_radius = radius;
        self
    }

    /// Set the artifact margin; clamped to 0.0-1.0.
    pub fn set_margin_fraction(mut self, fraction: f64) -> Self {
        self.margin_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Set the padding; negative values become zero.
    pub fn set_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    pub fn set_clamp_to_image(mut self, clamp: bool) -> Self {
        self.clamp_to_image = clamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scan_tuning() {
        let config = DetectorConfig::default();
        assert_eq!(config.low_threshold, 100.0);
        assert_eq!(config.high_threshold, 250.0);
        assert_eq!(config.close_radius, 2);
        assert_eq!(config.margin_fraction, 0.45);
        assert_eq!(config.padding, 10.0);
        assert!(!config.clamp_to_image);
    }

    #[test]
    fn test_builder_clamps_inputs() {
        let config = DetectorConfig::new()
            .set_margin_fraction(1.7)
            .set_padding(-3.0)
            .set_clamp_to_image(true);

        assert_eq!(config.margin_fraction, 1.0);
        assert_eq!(config.padding, 0.0);
        assert!(config.clamp_to_image);
    }
}
