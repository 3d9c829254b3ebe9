//! Interactive selection state and display/image coordinate mapping.
//!
//! The operator sees the scan scaled to fit a viewport and drags rectangles
//! in that display space; cropping needs image pixels. [`SelectionModel`]
//! keeps the selection in display space and converts back through the active
//! [`Transform`] on demand.
//!
//! State transitions:
//!
//! ```text
//! Empty ----begin_drag----> Dragging
//! Dragging --update_drag--> Dragging
//! Dragging --end_drag-----> Committed(Manual)   non-empty rectangle
//! Dragging --end_drag-----> Empty               zero width or height
//! any -------seed---------> Committed(Auto)
//! any -------clear--------> Empty
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::{DisplayPoint, DisplayRect, ImageRect, Rect};
use crate::transform::Transform;

/// Where the committed rectangle came from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Seeded from automatic detection.
    Auto,
    /// Drawn by the operator.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Empty,
    Dragging {
        start: DisplayPoint,
        current: DisplayPoint,
    },
    Committed {
        rect: DisplayRect,
        origin: Origin,
    },
}

/// Which transform converts a committed display rectangle back to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingPolicy {
    /// Use the transform in effect when the crop happens. A viewport resize
    /// between drawing and cropping shifts the selected pixels.
    #[default]
    CropTime,
    /// Use the transform in effect when the selection was committed.
    CommitTime,
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    state: SelectionState,
    transform: Option<Transform>,
    committed_with: Option<Transform>,
    policy: MappingPolicy,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(MappingPolicy::default())
    }
}

impl SelectionModel {
    pub fn new(policy: MappingPolicy) -> Self {
        Self {
            state: SelectionState::Empty,
            transform: None,
            committed_with: None,
            policy,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn policy(&self) -> MappingPolicy {
        self.policy
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    /// Replace the live transform, e.g. after the viewport was resized.
    ///
    /// The committed display rectangle is left untouched.
    pub fn set_transform(&mut self, transform: Option<Transform>) {
        self.transform = transform;
    }

    /// Origin of the committed selection, if any.
    pub fn origin(&self) -> Option<Origin> {
        match self.state {
            SelectionState::Committed { origin, .. } => Some(origin),
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.state, SelectionState::Committed { .. })
    }

    /// Commit an automatically detected image rectangle.
    ///
    /// Overrides any state, including a drag in progress.
    pub fn seed(&mut self, rect: ImageRect, transform: Transform) {
        self.transform = Some(transform);
        self.committed_with = Some(transform);
        self.state = SelectionState::Committed {
            rect: transform.rect_to_display(&rect),
            origin: Origin::Auto,
        };
    }

    /// Start a new drag. Any committed selection is discarded.
    pub fn begin_drag(&mut self, point: DisplayPoint) {
        self.state = SelectionState::Dragging {
            start: point,
            current: point,
        };
    }

    /// Move the drag endpoint. Ignored when no drag is in progress.
    pub fn update_drag(&mut self, point: DisplayPoint) {
        if let SelectionState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// Finish the drag at `point`.
    ///
    /// Returns `true` when a non-empty selection was committed. A drag that
    /// encloses no area leaves the model empty. Without a drag in progress
    /// this does nothing and returns `false`.
    pub fn end_drag(&mut self, point: DisplayPoint) -> bool {
        let SelectionState::Dragging { start, .. } = self.state else {
            return false;
        };

        let rect = Rect::from_corners(start, point);
        if rect.is_empty() {
            self.state = SelectionState::Empty;
            return false;
        }

        self.committed_with = self.transform;
        self.state = SelectionState::Committed {
            rect,
            origin: Origin::Manual,
        };
        true
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::Empty;
        self.committed_with = None;
    }

    /// The committed selection in image pixels.
    ///
    /// `None` when nothing is committed or no transform is available.
    pub fn current(&self) -> Option<ImageRect> {
        let SelectionState::Committed { rect, .. } = self.state else {
            return None;
        };

        let transform = match self.policy {
            MappingPolicy::CropTime => self.transform,
            MappingPolicy::CommitTime => self.committed_with.or(self.transform),
        }?;

        Some(transform.rect_to_image(&rect))
    }

    /// The display rectangle to draw: the live drag or the committed one.
    ///
    /// Under [`MappingPolicy::CommitTime`] the committed rectangle is moved
    /// into the live view, so the outline stays over the pixels
    /// [`current`](Self::current) will cut after a resize.
    pub fn preview(&self) -> Option<DisplayRect> {
        match self.state {
            SelectionState::Empty => None,
            SelectionState::Dragging { start, current } => Some(Rect::from_corners(start, current)),
            SelectionState::Committed { rect, .. } => {
                match (self.policy, self.committed_with, self.transform) {
                    (MappingPolicy::CommitTime, Some(then), Some(now)) => {
                        Some(now.rect_to_display(&then.rect_to_image(&rect)))
                    }
                    _ => Some(rect),
                }
            }
        }
    }
}
