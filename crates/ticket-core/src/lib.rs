//! Ticket Cropper Core - scan cropping library
//!
//! This crate provides the core functionality for cropping scanned tickets:
//! decoding scans, detecting the ticket region, tracking the operator's
//! selection in display coordinates and saving the crop as JPEG.

pub mod config;
pub mod decode;
pub mod detect;
pub mod encode;
pub mod geometry;
pub mod luminance;
pub mod selection;
pub mod session;
pub mod source;
pub mod transform;

pub use config::SessionConfig;
pub use decode::{DecodeError, DecodedImage, Decoder, FsDecoder};
pub use detect::{DetectorConfig, RegionDetector};
pub use encode::{CropRequest, EncodeError, ImageSink, JpegFileSink};
pub use geometry::{DisplayPoint, DisplayRect, ImagePoint, ImageRect, PixelRect};
pub use selection::{MappingPolicy, Origin, SelectionModel, SelectionState};
pub use session::{CropError, CropSession, LoadedImage, NamePrompt, NoPrompt};
pub use source::{list_images, ImageEntry};
pub use transform::Transform;
