//! PNG and JPEG scan decoding.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{ImageFormat, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode PNG or JPEG bytes into an upright RGB image.
///
/// The format is sniffed from the content, so a mislabelled extension does
/// not matter. Alpha is dropped and EXIF orientation is applied.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;

    if !matches!(reader.format(), Some(ImageFormat::Png | ImageFormat::Jpeg)) {
        return Err(DecodeError::UnsupportedFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    let orientation = read_orientation(bytes);
    if orientation != Orientation::Upright {
        log::debug!("Applying EXIF orientation {:?}", orientation);
    }

    Ok(orientation.apply(img).into_rgb8().into())
}

/// The EXIF orientation stored in `bytes`, or `Upright` when there is none.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)?
                .value
                .get_uint(0)
        })
        .and_then(Orientation::from_exif)
        .unwrap_or_default()
}
