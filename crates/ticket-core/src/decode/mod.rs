//! Image decoding for scanned tickets.
//!
//! This module provides functionality for:
//! - Decoding PNG and JPEG scans into RGB pixel buffers
//! - Applying EXIF orientation so the operator sees the upright scan
//!
//! The crop session reads images through the [`Decoder`] trait so that tests
//! can substitute in-memory images for files on disk.
//!
//! # Examples
//!
//! ```ignore
//! use ticket_core::decode::{Decoder, FsDecoder};
//!
//! let image = FsDecoder.decode("scans/ticket.jpg".as_ref()).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod raster;
mod types;

use std::path::Path;

pub use raster::{decode_image, read_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};

/// Turns an image path into RGB pixels.
pub trait Decoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError>;
}

/// Reads the file from disk and decodes it with [`decode_image`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDecoder;

impl Decoder for FsDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        let bytes = std::fs::read(path)?;
        decode_image(&bytes)
    }
}
