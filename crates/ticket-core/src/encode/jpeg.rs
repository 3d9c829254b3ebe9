//! JPEG output for cropped tickets.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Why a crop could not be written.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The pixel buffer is shorter or longer than `width * height * 3`.
    #[error("Pixel buffer holds {actual} bytes, {expected} expected for the image size")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Nothing to encode.
    #[error("Cannot encode a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("JPEG encoder failed: {0}")]
    EncodingFailed(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode an RGB image as baseline JPEG.
///
/// `quality` is clamped to 1-100.
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let DecodedImage {
        width,
        height,
        ref pixels,
    } = *image;

    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut bytes = Vec::with_capacity(expected / 8);
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(bytes)
}
