#![forbid(unsafe_code)]

//! Snapshot bookkeeping for the picker's cards.
//!
//! The picker renders each card from a static capture of the underlying
//! screen, taken lazily the first time the card becomes visible so hidden
//! screens are never forced to render. The host does the actual pixel
//! capture through [`SnapshotSource`]; this store tracks which indices have
//! a capture, at which size it is valid, and when the whole set must be
//! thrown away.
//!
//! # Invariants
//!
//! - Entries stay index-aligned with the picker's items; deleting an item
//!   deletes its entry at the same index
//! - A size change invalidates every capture, except a change back to a
//!   size the previous set was captured at, which restores that set
//!
//! # Failure Modes
//!
//! - A capture the host cannot produce degrades to a solid fill, never an
//!   error

use draftstack_core::geometry::Size;
use draftstack_core::metrics::SNAPSHOT_FADE_DURATION;
use draftstack_present::PackedColor;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Source contract
// ============================================================================

/// One captured card image, or the solid-fill stand-in for a screen that
/// could not be captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snapshot {
    /// A real capture. The token is an opaque host handle to the image.
    Captured { token: u64, size: Size },
    /// Best-effort fallback fill.
    SolidFill { color: PackedColor, size: Size },
}

impl Snapshot {
    #[must_use]
    pub fn size(&self) -> Size {
        match *self {
            Self::Captured { size, .. } | Self::SolidFill { size, .. } => size,
        }
    }
}

/// Host-side capture of picker items. Index 0 is the presenting screen;
/// indices 1.. are open drafts in picker order.
pub trait SnapshotSource {
    /// Capture item `index` at `size`, or `None` when the screen cannot
    /// render right now.
    fn capture(&mut self, index: usize, size: Size) -> Option<Snapshot>;

    /// Fill color used when [`Self::capture`] declines.
    fn fallback_fill(&self, index: usize) -> PackedColor {
        let _ = index;
        0xffffffff
    }
}

// ============================================================================
// Store
// ============================================================================

/// Index-aligned snapshot set with size-keyed invalidation.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: Vec<Option<Snapshot>>,
    /// Size the current entries were captured at.
    valid_size: Option<Size>,
    /// Previous set, kept across one size change so a suspend-time
    /// rotate/un-rotate cycle does not force a recapture.
    stashed: Option<(Size, Vec<Option<Snapshot>>)>,
    pending_fade: bool,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Capture every missing entry for `item_count` items at `size`.
    /// Entries that already exist are left alone.
    pub fn ensure_captured<S: SnapshotSource>(
        &mut self,
        source: &mut S,
        item_count: usize,
        size: Size,
    ) {
        if self.valid_size != Some(size) {
            self.entries.clear();
            self.valid_size = Some(size);
        }
        self.entries.resize(item_count, None);
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.is_some() {
                continue;
            }
            *entry = Some(source.capture(index, size).unwrap_or(Snapshot::SolidFill {
                color: source.fallback_fill(index),
                size,
            }));
        }
    }

    /// Remove the entry for a deleted item, shifting later entries down.
    pub fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    /// React to a container size change. Restores the stashed set when the
    /// new size matches it; otherwise stashes the current set and leaves
    /// the store empty for recapture, with a fade-in owed on the next
    /// capture pass.
    pub fn container_did_resize(&mut self, new_size: Size) {
        if self.valid_size == Some(new_size) {
            return;
        }
        if let Some((stashed_size, _)) = &self.stashed
            && *stashed_size == new_size
        {
            let (size, entries) = self.stashed.take().unwrap_or_default();
            debug!(?size, "restored stashed snapshots");
            self.entries = entries;
            self.valid_size = Some(size);
            return;
        }
        if let Some(size) = self.valid_size {
            self.stashed = Some((size, std::mem::take(&mut self.entries)));
        } else {
            self.entries.clear();
        }
        self.valid_size = None;
        self.pending_fade = true;
    }

    /// One-shot fade duration owed after the set was invalidated by a size
    /// change. Recaptured snapshots fade in over this duration.
    pub fn take_pending_fade(&mut self) -> Option<Duration> {
        if self.pending_fade {
            self.pending_fade = false;
            Some(SNAPSHOT_FADE_DURATION)
        } else {
            None
        }
    }

    /// Drop everything, including the stash.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.valid_size = None;
        self.stashed = None;
        self.pending_fade = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
