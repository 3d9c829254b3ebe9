//! Cutting a pixel region out of a decoded scan.

use crate::decode::DecodedImage;
use crate::geometry::PixelRect;

/// Copy `region` out of `image`.
///
/// The region is intersected with the image first. Returns `None` when
/// nothing of it lies inside the image.
pub fn crop_pixels(image: &DecodedImage, region: PixelRect) -> Option<DecodedImage> {
    let left = region.x.min(image.width);
    let top = region.y.min(image.height);
    let right = region.right().min(image.width);
    let bottom = region.bottom().min(image.height);

    if right <= left || bottom <= top {
        return None;
    }

    if (left, top, right, bottom) == (0, 0, image.width, image.height) {
        return Some(image.clone());
    }

    let stride = image.width as usize * 3;
    let span = left as usize * 3..right as usize * 3;
    let pixels = image
        .pixels
        .chunks_exact(stride)
        .skip(top as usize)
        .take((bottom - top) as usize)
        .flat_map(|row| &row[span.clone()])
        .copied()
        .collect();

    Some(DecodedImage::new(right - left, bottom - top, pixels))
}
