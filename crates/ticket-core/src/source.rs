//! Pending-image listing.
//!
//! The input directory is enumerated once when a session starts; files that
//! appear later are not picked up until the next session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions accepted as scans, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One pending image and its position in the session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub index: usize,
    pub path: PathBuf,
}

impl ImageEntry {
    /// File name for display, e.g. `scan_0001.jpg`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`].
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// List the scans in `dir`, sorted by file name.
///
/// Subdirectories are not descended into.
pub fn list_images(dir: &Path) -> io::Result<Vec<ImageEntry>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_image_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    log::info!("Found {} image(s) in {}", paths.len(), dir.display());

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| ImageEntry { index, path })
        .collect())
}
