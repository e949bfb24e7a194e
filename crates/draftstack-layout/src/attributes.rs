#![forbid(unsafe_code)]

//! Layout attribute types.

use draftstack_core::geometry::{Point, Rect};
use draftstack_core::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// Placement of one card in a layout pass.
///
/// Regenerated wholesale every pass; never patched incrementally. Item
/// counts are small (tens at most), so full regeneration is cheaper than
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutAttributes {
    pub index: usize,
    /// Untransformed frame in container coordinates.
    pub frame: Rect,
    pub transform: Transform3D,
    pub alpha: f32,
    /// Draw order; higher values draw on top.
    pub z_index: usize,
}

impl LayoutAttributes {
    /// Attributes with the identity transform and full opacity.
    #[must_use]
    pub fn new(index: usize, frame: Rect) -> Self {
        Self {
            index,
            frame,
            transform: Transform3D::identity(),
            alpha: 1.0,
            z_index: index,
        }
    }
}

/// Ephemeral horizontal-drag state for one card in the picker.
///
/// Exists only while the drag is active; cleared on gesture end whether the
/// card was deleted or snapped back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PannedItem {
    pub index: usize,
    /// Drag translation in container points.
    pub translation: Point,
}

/// Which of the three card arrangements a layout pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Every draft fanned out as a tilted stack; item 0 is the presenter
    /// background.
    #[default]
    AllDrafts,
    /// One draft pulled forward full-size over the shrunken presenter;
    /// later drafts staged off-screen below.
    DraftSelected { selected_index: usize },
    /// Presenter full-size with the drafts collapsed to an indicator-height
    /// sliver at the bottom edge.
    PresenterSelected,
}
