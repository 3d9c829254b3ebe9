//! Decoded scans and the errors produced while reading them.

use image::{DynamicImage, RgbImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither PNG nor JPEG.
    #[error("Not a PNG or JPEG image")]
    UnsupportedFormat,

    /// Recognised format but unreadable content.
    #[error("Damaged image data: {0}")]
    Corrupted(String),

    #[error("Could not read image: {0}")]
    Io(#[from] std::io::Error),
}

/// How a camera or scanner says the stored pixels must be turned to be
/// upright, as recorded in the EXIF orientation tag (values 1-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Upright,
    Mirrored,
    UpsideDown,
    MirroredUpsideDown,
    MirroredQuarterLeft,
    QuarterRight,
    MirroredQuarterRight,
    QuarterLeft,
}

impl Orientation {
    /// Map an EXIF orientation value. Unknown values yield `None`.
    pub fn from_exif(value: u32) -> Option<Self> {
        Some(match value {
            1 => Self::Upright,
            2 => Self::Mirrored,
            3 => Self::UpsideDown,
            4 => Self::MirroredUpsideDown,
            5 => Self::MirroredQuarterLeft,
            6 => Self::QuarterRight,
            7 => Self::MirroredQuarterRight,
            8 => Self::QuarterLeft,
            _ => return None,
        })
    }

    /// Turn the stored pixels upright.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Upright => img,
            Self::Mirrored => img.fliph(),
            Self::UpsideDown => img.rotate180(),
            Self::MirroredUpsideDown => img.flipv(),
            Self::MirroredQuarterLeft => img.rotate90().fliph(),
            Self::QuarterRight => img.rotate90(),
            Self::MirroredQuarterRight => img.rotate270().fliph(),
            Self::QuarterLeft => img.rotate270(),
        }
    }
}

/// An upright RGB scan held in memory.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes, `width * height * 3` long.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A single-colour image, mostly useful for synthetic scans.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = std::iter::repeat(rgb)
            .take(width as usize * height as usize)
            .flatten()
            .collect();
        Self::new(width, height, pixels)
    }

    /// Copy into an `image` buffer, e.g. for saving or filtering.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 3].copy_from_slice(&rgb);
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }
}

impl From<RgbImage> for DecodedImage {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}
