//! Crop output: JPEG encoding and writing the result to disk.
//!
//! A [`CropRequest`] bundles everything needed to produce one output file.
//! It is handed by value to an [`ImageSink`], which consumes it exactly
//! once; failed saves are never retried automatically.

mod jpeg;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::decode::DecodedImage;
use crate::geometry::PixelRect;
use crate::transform::crop_pixels;

pub use jpeg::{encode_jpeg, EncodeError};

/// One crop-and-save instruction.
#[derive(Debug)]
pub struct CropRequest<'a> {
    /// The full decoded source image.
    pub source: &'a DecodedImage,
    /// Region to keep, already clamped to the source bounds.
    pub region: PixelRect,
    /// Output base name, without directory or extension.
    pub name: String,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

/// Destination for cropped images.
pub trait ImageSink {
    /// Whether something already occupies `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Crop, encode and persist the request at `path`.
    fn save(&mut self, request: CropRequest<'_>, path: &Path) -> Result<(), EncodeError>;
}

/// Writes JPEG files to the local file system.
///
/// Missing parent directories are created. Output is staged in a temporary
/// file next to the destination and only moved into place once complete, so
/// a failed save leaves nothing behind and an existing file is never
/// overwritten, even if it appeared after the collision check.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegFileSink;

impl ImageSink for JpegFileSink {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn save(&mut self, request: CropRequest<'_>, path: &Path) -> Result<(), EncodeError> {
        let cropped = crop_pixels(request.source, request.region).ok_or(
            EncodeError::InvalidDimensions {
                width: request.region.width,
                height: request.region.height,
            },
        )?;
        let bytes = encode_jpeg(&cropped, request.quality)?;

        write_new_file(path, |file| file.write_all(&bytes))?;

        log::debug!(
            "Wrote {} bytes ({}x{}, quality {}) to {}",
            bytes.len(),
            cropped.width,
            cropped.height,
            request.quality,
            path.display()
        );
        Ok(())
    }
}

/// Create `path` with the contents written by `fill`.
///
/// The data goes to a temporary file in the destination directory, is
/// synced and then linked to `path` without replacing anything already
/// there (`AlreadyExists`). On any error the temporary file is removed.
fn write_new_file<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".ticket-")
        .suffix(".part")
        .tempfile_in(dir)?;
    fill(staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}
