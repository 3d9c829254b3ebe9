//! Session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::detect::DetectorConfig;
use crate::selection::MappingPolicy;
use crate::session::DEFAULT_QUALITY;

/// Settings for a [`CropSession`](crate::session::CropSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory cropped tickets are written to.
    pub output_dir: PathBuf,

    /// Extension appended to output names, without the dot.
    pub extension: String,

    /// Display area the scan is fitted into.
    pub viewport_width: f64,
    pub viewport_height: f64,

    /// JPEG quality before the operator changes it (1-100).
    pub default_quality: u8,

    /// How committed selections are mapped back to image pixels.
    pub mapping: MappingPolicy,

    /// Region detector tuning.
    pub detector: DetectorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("done"),
            extension: "jpg".to_string(),
            viewport_width: 800.0,
            viewport_height: 600.0,
            default_quality: DEFAULT_QUALITY,
            mapping: MappingPolicy::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn set_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the starting quality; clamped to 1-100.
    pub fn set_default_quality(mut self, quality: u8) -> Self {
        self.default_quality = quality.clamp(1, 100);
        self
    }

    pub fn set_mapping(mut self, mapping: MappingPolicy) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn set_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }
}
