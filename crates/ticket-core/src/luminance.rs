//! Single-channel intensity conversion using ITU-R BT.601 coefficients.
//!
//! Edge detection works on one channel. BT.601 weights match what scanner
//! drivers and most RGB-to-gray converters produce, so thresholds tuned on
//! their output carry over.

use image::{GrayImage, Luma};

use crate::decode::DecodedImage;

/// ITU-R BT.601 coefficient for red channel.
pub const LUMA_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel.
pub const LUMA_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel.
pub const LUMA_B: f32 = 0.114;

/// Calculate intensity from u8 RGB values (0 to 255).
#[inline]
pub fn intensity_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Convert an RGB image to an 8-bit grayscale image.
pub fn to_intensity(image: &DecodedImage) -> GrayImage {
    GrayImage::from_fn(image.width, image.height, |x, y| {
        let [r, g, b] = image.pixel(x, y);
        Luma([intensity_u8(r, g, b)])
    })
}
