//! Errors surfaced to the operator by a crop session.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Why a `load` or `commit` did not happen.
///
/// None of these is fatal: the session stays usable and no file has been
/// written when one is returned.
#[derive(Debug, Error)]
pub enum CropError {
    /// No committed selection to crop.
    #[error("No area selected; drag a rectangle around the ticket")]
    NoSelection,

    /// The selection lies outside the image.
    #[error("Selection does not overlap the image; draw it again")]
    EmptyAfterClamp,

    /// No output name given and the prompt was cancelled or left blank.
    #[error("No file name given; enter a name for the cropped ticket")]
    NoFileName,

    /// The name contains path separators or `.`/`..` parts.
    #[error("'{0}' is not a plain file name; leave out folders and separators")]
    InvalidFileName(String),

    /// The output file already exists.
    #[error("{} already exists; choose another name", .0.display())]
    NameCollision(PathBuf),

    /// Cropping, encoding or writing the output failed.
    #[error("Failed to save crop: {0}")]
    EncodeFailed(#[from] EncodeError),

    /// The image could not be decoded.
    #[error("Failed to load image: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// No pending image at the requested position.
    #[error("No image at position {index} (session has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Nothing is loaded yet.
    #[error("No image loaded")]
    NoImage,
}
