//! Per-session bookkeeping and checks on the name and quality fields.

use std::path::{Component, Path};

/// Quality used until the operator enters a valid one.
pub const DEFAULT_QUALITY: u8 = 90;

/// Parse a quality field value.
///
/// Accepts a whole number in 1-100, surrounded by optional whitespace.
pub fn parse_quality(text: &str) -> Option<u8> {
    text.trim()
        .parse::<u8>()
        .ok()
        .filter(|q| (1..=100).contains(q))
}

/// Whether `name` can be used as an output base name.
///
/// The name must stay a single file inside the output directory: no path
/// separators, no drive or root prefix and no `.`/`..` components.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains(['/', '\\', ':'])
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}

/// Mutable state that outlives a single image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Position of the active image in the pending list.
    pub index: usize,
    /// Last quality value that parsed successfully.
    pub quality: u8,
    /// Raw contents of the quality field.
    pub quality_text: String,
    /// Output name typed for the current image; cleared on every load.
    pub file_name: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_quality(DEFAULT_QUALITY)
    }
}

impl SessionState {
    pub fn with_quality(quality: u8) -> Self {
        Self {
            index: 0,
            quality: quality.clamp(1, 100),
            quality_text: quality.clamp(1, 100).to_string(),
            file_name: String::new(),
        }
    }

    /// Record an edit of the quality field.
    ///
    /// Valid values immediately become the fallback; invalid text is kept
    /// as typed and resolved at commit time.
    pub fn set_quality_text(&mut self, text: &str) {
        self.quality_text = text.to_string();
        if let Some(q) = parse_quality(text) {
            self.quality = q;
        }
    }

    /// Resolve a quality field, falling back to the last valid value.
    ///
    /// A valid value also becomes the new fallback.
    pub fn resolve_quality(&mut self, text: &str) -> u8 {
        match parse_quality(text) {
            Some(q) => {
                self.quality = q;
                q
            }
            None => {
                log::warn!(
                    "Invalid quality {:?}, using last valid value {}",
                    text,
                    self.quality
                );
                self.quality
            }
        }
    }
}
