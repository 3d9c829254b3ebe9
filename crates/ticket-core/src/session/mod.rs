//! Crop session: walks the pending scans, seeds a selection from automatic
//! detection and turns the operator's final selection into one saved crop.
//!
//! # Lifecycle per image
//!
//! 1. [`CropSession::load`] decodes the scan, fits it into the viewport,
//!    runs detection and seeds the selection (or leaves it empty)
//! 2. The operator may redraw the selection through
//!    [`CropSession::selection_mut`]; a manual selection is never replaced
//!    automatically afterwards
//! 3. [`CropSession::commit`] validates the selection, name and quality,
//!    refuses to overwrite existing files, saves and moves to the next scan
//!
//! Every failure leaves the session usable and writes nothing.

mod error;
mod state;

use std::path::PathBuf;

use crate::config::SessionConfig;
use crate::decode::{DecodedImage, Decoder};
use crate::detect::RegionDetector;
use crate::encode::{CropRequest, ImageSink};
use crate::geometry::ImageRect;
use crate::selection::SelectionModel;
use crate::source::ImageEntry;
use crate::transform::Transform;

pub use error::CropError;
pub use state::{is_plain_file_name, parse_quality, SessionState, DEFAULT_QUALITY};

/// Asks the operator for an output name when the name field is blank.
pub trait NamePrompt {
    /// `None` when the operator cancels.
    fn prompt(&mut self) -> Option<String>;
}

impl<F> NamePrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn prompt(&mut self) -> Option<String> {
        self()
    }
}

/// A prompt that is always cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl NamePrompt for NoPrompt {
    fn prompt(&mut self) -> Option<String> {
        None
    }
}

/// The scan currently shown to the operator.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub entry: ImageEntry,
    pub pixels: DecodedImage,
    /// `None` while the viewport has no area.
    pub transform: Option<Transform>,
    /// What automatic detection found at load time.
    pub detected: Option<ImageRect>,
}

pub struct CropSession<D, S> {
    entries: Vec<ImageEntry>,
    config: SessionConfig,
    detector: RegionDetector,
    decoder: D,
    sink: S,
    state: SessionState,
    selection: SelectionModel,
    loaded: Option<LoadedImage>,
}

impl<D: Decoder, S: ImageSink> CropSession<D, S> {
    /// Create a session over a fixed list of pending images.
    ///
    /// Nothing is loaded until [`load`](Self::load) is called.
    pub fn new(entries: Vec<ImageEntry>, config: SessionConfig, decoder: D, sink: S) -> Self {
        Self {
            detector: RegionDetector::new(config.detector.clone()),
            selection: SelectionModel::new(config.mapping),
            state: SessionState::with_quality(config.default_quality),
            entries,
            config,
            decoder,
            sink,
            loaded: None,
        }
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn loaded(&self) -> Option<&LoadedImage> {
        self.loaded.as_ref()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load the image at `index` and seed the selection from detection.
    ///
    /// On failure the previously loaded image, selection and position are
    /// kept.
    pub fn load(&mut self, index: usize) -> Result<&LoadedImage, CropError> {
        let entry = self
            .entries
            .get(index)
            .cloned()
            .ok_or(CropError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })?;

        let pixels = self.decoder.decode(&entry.path).map_err(|e| {
            log::error!("Failed to decode {}: {}", entry.path.display(), e);
            CropError::from(e)
        })?;

        let transform = self.fit(&pixels);
        let detected = self.detector.detect(&pixels);

        self.selection.clear();
        self.selection.set_transform(transform);
        match (detected, transform) {
            (Some(rect), Some(t)) => self.selection.seed(rect, t),
            (Some(_), None) => log::warn!("Viewport has no area; detected region not shown"),
            (None, _) => {}
        }

        log::info!(
            "Loaded {} ({}/{}, {}x{})",
            entry.file_name(),
            index + 1,
            self.entries.len(),
            pixels.width,
            pixels.height
        );

        self.state.index = index;
        self.state.file_name.clear();

        Ok(self.loaded.insert(LoadedImage {
            entry,
            pixels,
            transform,
            detected,
        }))
    }

    /// Move to the next image. Does nothing on the last one.
    ///
    /// While nothing is loaded yet, e.g. after the first scan failed to
    /// decode, this loads the current position instead of skipping it.
    ///
    /// Returns whether an image was loaded.
    pub fn next(&mut self) -> Result<bool, CropError> {
        let target = match self.loaded {
            Some(_) => self.state.index + 1,
            None => self.state.index,
        };
        if target >= self.entries.len() {
            return Ok(false);
        }
        self.load(target).map(|_| true)
    }

    /// Move to the previous image. Does nothing on the first one.
    ///
    /// Returns whether the position changed.
    pub fn previous(&mut self) -> Result<bool, CropError> {
        let Some(target) = self.state.index.checked_sub(1) else {
            return Ok(false);
        };
        if target >= self.entries.len() {
            return Ok(false);
        }
        self.load(target).map(|_| true)
    }

    /// The display area changed size: refit the image.
    ///
    /// The selection keeps its display coordinates; how that affects the
    /// crop depends on the configured [`MappingPolicy`].
    ///
    /// [`MappingPolicy`]: crate::selection::MappingPolicy
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.config.viewport_width = width;
        self.config.viewport_height = height;

        let transform = self.loaded.as_ref().and_then(|l| self.fit(&l.pixels));
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.transform = transform;
            self.selection.set_transform(transform);
        }
    }

    /// Run detection again on the current image and reseed the selection.
    ///
    /// This replaces a manual selection, so it is only ever triggered by the
    /// operator.
    pub fn redetect(&mut self) -> Result<Option<ImageRect>, CropError> {
        let loaded = self.loaded.as_mut().ok_or(CropError::NoImage)?;
        let detected = self.detector.detect(&loaded.pixels);
        loaded.detected = detected;

        match (detected, loaded.transform) {
            (Some(rect), Some(t)) => self.selection.seed(rect, t),
            _ => self.selection.clear(),
        }
        Ok(detected)
    }

    pub fn set_file_name(&mut self, name: &str) {
        self.state.file_name = name.to_string();
    }

    pub fn set_quality_text(&mut self, text: &str) {
        self.state.set_quality_text(text);
    }

    /// Commit using the session's own name and quality fields.
    pub fn commit_pending(&mut self, prompt: &mut impl NamePrompt) -> Result<PathBuf, CropError> {
        let name = self.state.file_name.clone();
        let quality = self.state.quality_text.clone();
        self.commit(&name, &quality, prompt)
    }

    /// Crop the committed selection and save it as `custom_name`.
    ///
    /// A blank name falls back to `prompt`. The name must be a plain file
    /// name; anything with path parts is rejected. Unparseable quality falls back to
    /// the last valid value. On success the session moves to the next image
    /// and the saved path is returned.
    pub fn commit(
        &mut self,
        custom_name: &str,
        quality: &str,
        prompt: &mut impl NamePrompt,
    ) -> Result<PathBuf, CropError> {
        let loaded = self.loaded.as_ref().ok_or(CropError::NoImage)?;

        let rect = self.selection.current().ok_or(CropError::NoSelection)?;
        let region = rect
            .to_pixel_rect(loaded.pixels.width, loaded.pixels.height)
            .ok_or(CropError::EmptyAfterClamp)?;

        let name = match custom_name.trim() {
            "" => prompt
                .prompt()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .ok_or(CropError::NoFileName)?,
            name => name.to_string(),
        };
        if !is_plain_file_name(&name) {
            return Err(CropError::InvalidFileName(name));
        }

        let quality = self.state.resolve_quality(quality);

        let path = self
            .config
            .output_dir
            .join(format!("{}.{}", name, self.config.extension));
        if self.sink.exists(&path) {
            return Err(CropError::NameCollision(path));
        }

        let request = CropRequest {
            source: &loaded.pixels,
            region,
            name,
            quality,
        };
        self.sink.save(request, &path)?;

        log::info!(
            "Saved {} from {} ({}x{} at {},{}; quality {})",
            path.display(),
            loaded.entry.file_name(),
            region.width,
            region.height,
            region.x,
            region.y,
            quality
        );

        self.state.file_name.clear();
        if let Err(e) = self.next() {
            log::error!("Saved, but could not open the next image: {}", e);
        }
        Ok(path)
    }

    fn fit(&self, pixels: &DecodedImage) -> Option<Transform> {
        Transform::fit(
            pixels.width,
            pixels.height,
            self.config.viewport_width,
            self.config.viewport_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeError, FsDecoder};
    use crate::encode::{EncodeError, JpegFileSink};
    use crate::geometry::{PixelRect, Point};
    use crate::selection::{MappingPolicy, Origin};
    use std::collections::{HashMap, HashSet};
    use std::path::Path;

    /// Serves in-memory images by path.
    #[derive(Default)]
    struct MemoryDecoder {
        images: HashMap<PathBuf, DecodedImage>,
    }

    impl Decoder for MemoryDecoder {
        fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
            self.images
                .get(path)
                .cloned()
                .ok_or(DecodeError::UnsupportedFormat)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Saved {
        path: PathBuf,
        region: PixelRect,
        name: String,
        quality: u8,
    }

    /// Records save calls instead of touching the disk.
    #[derive(Default)]
    struct RecordingSink {
        existing: HashSet<PathBuf>,
        saved: Vec<Saved>,
        fail: bool,
    }

    impl ImageSink for RecordingSink {
        fn exists(&self, path: &Path) -> bool {
            self.existing.contains(path)
        }

        fn save(&mut self, request: CropRequest<'_>, path: &Path) -> Result<(), EncodeError> {
            if self.fail {
                return Err(EncodeError::EncodingFailed("disk full".to_string()));
            }
            self.saved.push(Saved {
                path: path.to_path_buf(),
                region: request.region,
                name: request.name,
                quality: request.quality,
            });
            Ok(())
        }
    }

    type TestSession = CropSession<MemoryDecoder, RecordingSink>;

    /// Black scan with a white ticket at (x1, y1)-(x2, y2).
    fn scan(width: u32, height: u32, ticket: Option<(u32, u32, u32, u32)>) -> DecodedImage {
        let mut img = DecodedImage::filled(width, height, [0, 0, 0]);
        if let Some((x1, y1, x2, y2)) = ticket {
            for y in y1..y2 {
                for x in x1..x2 {
                    img.set_pixel(x, y, [255, 255, 255]);
                }
            }
        }
        img
    }

    fn session_with(images: Vec<DecodedImage>, config: SessionConfig) -> TestSession {
        let mut decoder = MemoryDecoder::default();
        let mut entries = Vec::new();
        for (index, img) in images.into_iter().enumerate() {
            let path = PathBuf::from(format!("todo/scan_{index}.png"));
            decoder.images.insert(path.clone(), img);
            entries.push(ImageEntry { index, path });
        }
        CropSession::new(entries, config, decoder, RecordingSink::default())
    }

    /// Three 200x150 scans shown 1:1 in a 200x150 viewport.
    fn three_scans() -> TestSession {
        let config = SessionConfig::new().set_viewport(200.0, 150.0);
        session_with(
            vec![
                scan(200, 150, Some((40, 30, 100, 110))),
                scan(200, 150, None),
                scan(200, 150, Some((20, 20, 60, 60))),
            ],
            config,
        )
    }

    fn manual_drag(session: &mut TestSession, from: (f64, f64), to: (f64, f64)) -> bool {
        let selection = session.selection_mut();
        selection.begin_drag(Point::new(from.0, from.1));
        selection.update_drag(Point::new(to.0, to.1));
        selection.end_drag(Point::new(to.0, to.1))
    }

    #[test]
    fn test_load_seeds_auto_selection() {
        let mut session = three_scans();
        let loaded = session.load(0).unwrap();
        let detected = loaded.detected.unwrap();

        assert!(detected.contains(&ImageRect::from_edges(40.0, 30.0, 100.0, 110.0)));
        assert_eq!(session.selection().origin(), Some(Origin::Auto));

        let current = session.selection().current().unwrap();
        assert!((current.left() - detected.left()).abs() < 1e-9);
        assert!((current.bottom() - detected.bottom()).abs() < 1e-9);
    }

    #[test]
    fn test_load_blank_scan_leaves_selection_empty() {
        let mut session = three_scans();
        session.load(0).unwrap();
        session.load(1).unwrap();

        assert!(session.loaded().unwrap().detected.is_none());
        assert!(session.selection().current().is_none());
    }

    #[test]
    fn test_load_resets_manual_override_and_name() {
        let mut session = three_scans();
        session.load(1).unwrap();
        assert!(manual_drag(&mut session, (10.0, 10.0), (50.0, 50.0)));
        session.set_file_name("draft");

        session.load(1).unwrap();
        assert!(session.selection().current().is_none());
        assert_eq!(session.state().file_name, "");
    }

    #[test]
    fn test_load_out_of_range() {
        let mut session = three_scans();
        let err = session.load(3).unwrap_err();
        assert!(matches!(err, CropError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_decode_failure_keeps_previous_image() {
        let mut session = three_scans();
        session.load(0).unwrap();
        session.decoder.images.clear();

        let err = session.load(2).unwrap_err();
        assert!(matches!(err, CropError::DecodeFailed(_)));
        assert_eq!(session.state().index, 0);
        assert_eq!(session.loaded().unwrap().entry.index, 0);
        assert_eq!(session.selection().origin(), Some(Origin::Auto));
    }

    #[test]
    fn test_commit_saves_auto_selection() {
        let mut session = three_scans();
        session.load(0).unwrap();

        let path = session.commit("ticket1", "90", &mut NoPrompt).unwrap();
        assert_eq!(path, PathBuf::from("done/ticket1.jpg"));

        let saved = &session.sink().saved;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "ticket1");
        assert_eq!(saved[0].quality, 90);

        // Padded by 10 around the ticket, inside the 200x150 scan
        let region = saved[0].region;
        assert!(region.x <= 40 && region.x >= 27);
        assert!(region.right() >= 100 && region.right() <= 113);
        assert!(region.bottom() >= 110 && region.bottom() <= 123);
    }

    #[test]
    fn test_commit_without_image() {
        let mut session = three_scans();
        let err = session.commit("ticket", "90", &mut NoPrompt).unwrap_err();
        assert!(matches!(err, CropError::NoImage));
    }

    #[test]
    fn test_commit_without_selection_does_no_io() {
        let mut session = three_scans();
        session.load(1).unwrap();

        let err = session.commit("ticket", "90", &mut NoPrompt).unwrap_err();
        assert!(matches!(err, CropError::NoSelection));
        assert!(session.sink().saved.is_empty());
        assert_eq!(session.state().index, 1);
    }

    #[test]
    fn test_commit_selection_outside_image_does_no_io() {
        // 200x100 scan in a 200x200 viewport: 50px bands above and below
        let config = SessionConfig::new().set_viewport(200.0, 200.0);
        let mut session = session_with(vec![scan(200, 100, None)], config);
        session.load(0).unwrap();
        assert!(manual_drag(&mut session, (10.0, 0.0), (50.0, 40.0)));

        let err = session.commit("ticket", "90", &mut NoPrompt).unwrap_err();
        assert!(matches!(err, CropError::EmptyAfterClamp));
        assert!(session.sink().saved.is_empty());
    }

    #[test]
    fn test_commit_blank_name_cancelled_prompt_does_no_io() {
        let mut session = three_scans();
        session.load(0).unwrap();

        let err = session.commit("   ", "90", &mut NoPrompt).unwrap_err();
        assert!(matches!(err, CropError::NoFileName));

        let mut blank = || Some("  ".to_string());
        let err = session.commit("", "90", &mut blank).unwrap_err();
        assert!(matches!(err, CropError::NoFileName));

        assert!(session.sink().saved.is_empty());
        assert_eq!(session.state().index, 0);
    }

    #[test]
    fn test_commit_blank_name_uses_prompt() {
        let mut session = three_scans();
        session.load(0).unwrap();

        let mut asked = 0;
        let mut prompt = || {
            asked += 1;
            Some(" from_prompt ".to_string())
        };
        let path = session.commit("", "90", &mut prompt).unwrap();

        assert_eq!(asked, 1);
        assert_eq!(path, PathBuf::from("done/from_prompt.jpg"));
    }

    #[test]
    fn test_commit_name_collision_does_no_io() {
        let mut session = three_scans();
        session
            .sink
            .existing
            .insert(PathBuf::from("done/ticket1.jpg"));
        session.load(0).unwrap();

        let err = session.commit("ticket1", "90", &mut NoPrompt).unwrap_err();
        match err {
            CropError::NameCollision(path) => assert_eq!(path, PathBuf::from("done/ticket1.jpg")),
            other => panic!("expected NameCollision, got {other:?}"),
        }
        assert!(session.sink().saved.is_empty());
        assert_eq!(session.state().index, 0);

        // A different name goes through
        assert!(session.commit("ticket2", "90", &mut NoPrompt).is_ok());
    }

    #[test]
    fn test_commit_rejects_names_with_path_parts() {
        let mut session = three_scans();
        session.load(0).unwrap();

        for name in ["/tmp/x", "../x", "sub/ticket", ".."] {
            let err = session.commit(name, "90", &mut NoPrompt).unwrap_err();
            assert!(
                matches!(err, CropError::InvalidFileName(ref n) if n == name),
                "{name:?} gave {err:?}"
            );
        }

        let mut sneaky = || Some("../../outside".to_string());
        let err = session.commit("", "90", &mut sneaky).unwrap_err();
        assert!(matches!(err, CropError::InvalidFileName(_)));

        assert!(session.sink().saved.is_empty());
        assert_eq!(session.state().index, 0);
    }

    #[test]
    fn test_saved_path_stays_in_output_dir() {
        let mut session = three_scans();
        session.load(0).unwrap();

        let path = session.commit("  ticket 7  ", "90", &mut NoPrompt).unwrap();
        assert_eq!(path.parent(), Some(Path::new("done")));
        assert_eq!(path.file_name().unwrap(), "ticket 7.jpg");
    }

    #[test]
    fn test_invalid_quality_falls_back() {
        let mut session = three_scans();
        session.load(0).unwrap();

        session.commit("a", "abc", &mut NoPrompt).unwrap();
        assert_eq!(session.sink().saved[0].quality, 90);
    }

    #[test]
    fn test_valid_quality_becomes_fallback() {
        let mut session = three_scans();
        session.load(0).unwrap();
        session.commit("a", "55", &mut NoPrompt).unwrap();

        session.load(2).unwrap();
        session.commit("b", "500", &mut NoPrompt).unwrap();

        let qualities: Vec<_> = session.sink().saved.iter().map(|s| s.quality).collect();
        assert_eq!(qualities, vec![55, 55]);
    }

    #[test]
    fn test_commit_pending_uses_fields() {
        let mut session = three_scans();
        session.load(0).unwrap();
        session.set_file_name("field_name");
        session.set_quality_text("70");
        session.set_quality_text("7x");

        session.commit_pending(&mut NoPrompt).unwrap();
        let saved = &session.sink().saved[0];
        assert_eq!(saved.name, "field_name");
        assert_eq!(saved.quality, 70);
    }

    #[test]
    fn test_commit_advances_and_clears_name() {
        let mut session = three_scans();
        session.load(0).unwrap();
        session.set_file_name("first");

        session.commit_pending(&mut NoPrompt).unwrap();
        assert_eq!(session.state().index, 1);
        assert_eq!(session.state().file_name, "");
    }

    #[test]
    fn test_commit_on_last_image_stays() {
        let mut session = three_scans();
        session.load(2).unwrap();
        session.commit("last", "90", &mut NoPrompt).unwrap();
        assert_eq!(session.state().index, 2);
    }

    #[test]
    fn test_encode_failure_is_reported() {
        let mut session = three_scans();
        session.sink.fail = true;
        session.load(0).unwrap();

        let err = session.commit("ticket", "90", &mut NoPrompt).unwrap_err();
        assert!(matches!(err, CropError::EncodeFailed(_)));
        assert_eq!(session.state().index, 0);
    }

    #[test]
    fn test_navigation_does_not_wrap() {
        let mut session = three_scans();
        session.load(0).unwrap();

        assert!(!session.previous().unwrap());
        assert_eq!(session.state().index, 0);

        assert!(session.next().unwrap());
        assert!(session.next().unwrap());
        assert_eq!(session.state().index, 2);

        assert!(!session.next().unwrap());
        assert_eq!(session.state().index, 2);

        assert!(session.previous().unwrap());
        assert_eq!(session.state().index, 1);
    }

    #[test]
    fn test_next_before_any_load_opens_first_scan() {
        let mut session = three_scans();
        assert!(session.next().unwrap());
        assert_eq!(session.loaded().unwrap().entry.index, 0);
        assert_eq!(session.state().index, 0);

        assert!(session.next().unwrap());
        assert_eq!(session.state().index, 1);
    }

    #[test]
    fn test_next_retries_first_scan_after_failed_load() {
        let mut session = three_scans();
        let first = session.decoder.images.remove(Path::new("todo/scan_0.png")).unwrap();
        assert!(session.load(0).is_err());

        session
            .decoder
            .images
            .insert(PathBuf::from("todo/scan_0.png"), first);
        assert!(session.next().unwrap());
        assert_eq!(session.loaded().unwrap().entry.index, 0);
    }

    #[test]
    fn test_empty_session_navigation() {
        let mut session = session_with(vec![], SessionConfig::default());
        assert!(!session.next().unwrap());
        assert!(!session.previous().unwrap());
        assert!(session.load(0).is_err());
    }

    #[test]
    fn test_manual_selection_survives_resize() {
        let mut session = three_scans();
        session.load(0).unwrap();
        assert!(manual_drag(&mut session, (10.0, 10.0), (60.0, 60.0)));

        session.resize_viewport(400.0, 300.0);
        assert_eq!(session.selection().origin(), Some(Origin::Manual));
    }

    #[test]
    fn test_resize_between_draw_and_crop_uses_crop_time_transform() {
        let mut session = three_scans();
        session.load(1).unwrap();
        assert!(manual_drag(&mut session, (20.0, 20.0), (60.0, 60.0)));

        // Scale 2: the same display rectangle now covers half as many pixels
        session.resize_viewport(400.0, 300.0);
        session.commit("shifted", "90", &mut NoPrompt).unwrap();

        let region = session.sink().saved[0].region;
        assert_eq!(
            region,
            PixelRect {
                x: 10,
                y: 10,
                width: 20,
                height: 20
            }
        );
    }

    #[test]
    fn test_resize_between_draw_and_crop_with_commit_time_snapshot() {
        let config = SessionConfig::new()
            .set_viewport(200.0, 150.0)
            .set_mapping(MappingPolicy::CommitTime);
        let mut session = session_with(vec![scan(200, 150, None)], config);
        session.load(0).unwrap();
        assert!(manual_drag(&mut session, (20.0, 20.0), (60.0, 60.0)));

        session.resize_viewport(400.0, 300.0);
        session.commit("stable", "90", &mut NoPrompt).unwrap();

        let region = session.sink().saved[0].region;
        assert_eq!(
            region,
            PixelRect {
                x: 20,
                y: 20,
                width: 40,
                height: 40
            }
        );
    }

    #[test]
    fn test_redetect_replaces_manual_selection() {
        let mut session = three_scans();
        session.load(0).unwrap();
        assert!(manual_drag(&mut session, (150.0, 10.0), (190.0, 40.0)));

        let detected = session.redetect().unwrap();
        assert!(detected.is_some());
        assert_eq!(session.selection().origin(), Some(Origin::Auto));
    }

    #[test]
    fn test_zero_viewport_has_no_selection() {
        let config = SessionConfig::new().set_viewport(0.0, 0.0);
        let mut session = session_with(vec![scan(200, 150, Some((40, 30, 100, 110)))], config);
        let loaded = session.load(0).unwrap();

        assert!(loaded.transform.is_none());
        assert!(loaded.detected.is_some());
        assert!(matches!(
            session.commit("x", "90", &mut NoPrompt),
            Err(CropError::NoSelection)
        ));
    }

    #[test]
    fn test_existing_output_file_is_left_untouched() {
        let todo = tempfile::tempdir().unwrap();
        let done = tempfile::tempdir().unwrap();

        let scan_path = todo.path().join("scan.png");
        scan(120, 90, Some((20, 20, 60, 70)))
            .to_rgb_image()
            .unwrap()
            .save(&scan_path)
            .unwrap();
        let existing = done.path().join("ticket1.jpg");
        std::fs::write(&existing, b"original").unwrap();

        let entries = crate::source::list_images(todo.path()).unwrap();
        let config = SessionConfig::new()
            .set_output_dir(done.path())
            .set_viewport(120.0, 90.0);
        let mut session = CropSession::new(entries, config, FsDecoder, JpegFileSink);
        session.load(0).unwrap();

        let err = session.commit("ticket1", "90", &mut NoPrompt).unwrap_err();
        assert!(matches!(err, CropError::NameCollision(_)));
        assert_eq!(std::fs::read(&existing).unwrap(), b"original");

        let saved = session.commit("ticket2", "80", &mut NoPrompt).unwrap();
        let written = image::open(&saved).unwrap();
        assert!(written.width() >= 40 && written.width() <= 64);
    }
}
