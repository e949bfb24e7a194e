#![forbid(unsafe_code)]

//! The open-draft selector.
//!
//! Hosts the stack layout over one item per open draft plus the presenting
//! screen at index 0, routes card taps into either a plain dismissal or a
//! presentation swap, and turns horizontal card drags into swipe-to-delete.
//!
//! The controller renders from its own ordered copy of the registry's ids,
//! never from the live list, so a registry mutation mid-pass cannot shear
//! the layout. The copy is refreshed explicitly.
//!
//! # Invariants
//!
//! - Item 0 always denotes "return to presenter"; drafts occupy 1..
//! - `item_count == 1 + draft_ids.len()` between mutations
//! - At most one card pan is active at a time, never on item 0
//!
//! # Failure Modes
//!
//! - Selecting an out-of-range item is a programmer error and asserts
//! - Deleting the last draft dismisses the whole picker instead of leaving
//!   an empty stack

use crate::snapshot::{SnapshotSource, SnapshotStore};
use draftstack_core::geometry::Size;
use draftstack_core::gesture::{
    DragArbiter, DragArbiterConfig, PanGesture, PanPhase, is_horizontal,
};
use draftstack_layout::attributes::{LayoutAttributes, LayoutMode, PannedItem};
use draftstack_layout::stack::{LayoutSolution, StackLayout};
use draftstack_present::{DraftId, OpenDraftsRegistry};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

// ============================================================================
// Outcomes
// ============================================================================

/// What the host must do after a card tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Item 0: dismiss the picker back to the presenter.
    Dismiss,
    /// A draft card: dismiss-then-present the target draft behind a cover
    /// snapshot. The host calls
    /// [`OpenDraftSelectorController::swap_did_complete`] once the new
    /// presentation's completion fires.
    SwapPresentation { target: DraftId },
}

/// What the host must do after a card pan update.
#[derive(Debug, Clone, PartialEq)]
pub enum CardPanOutcome {
    /// Not a recognizable card pan in the current state.
    Ignored,
    /// Drag is live; re-solve the layout.
    Updated,
    /// Released without committing; the card snaps back.
    SnappedBack,
    /// Delete committed. Animate the card out to `disappearing_target`,
    /// then drop it; the registry entry is already gone.
    Deleted {
        item_index: usize,
        disappearing_target: Option<LayoutAttributes>,
    },
    /// The last draft was deleted; dismiss the whole picker.
    PickerShouldDismiss {
        disappearing_target: Option<LayoutAttributes>,
    },
}

// ============================================================================
// Persistence
// ============================================================================

/// Serialized picker state: the draft order it was showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerSnapshot {
    pub draft_ids: Vec<DraftId>,
}

// ============================================================================
// Controller
// ============================================================================

/// Drives the stacked-card picker over all open drafts.
#[derive(Debug)]
pub struct OpenDraftSelectorController {
    registry: OpenDraftsRegistry,
    container: Size,
    /// Ordered copy of the registry at the last reload.
    draft_ids: Vec<DraftId>,
    layout: StackLayout,
    snapshots: SnapshotStore,
    arbiter: DragArbiter,
    /// Full-window snapshot shown over the picker during a presentation
    /// swap; removals arriving while it is up are deferred.
    cover_active: bool,
    deferred_removals: Vec<DraftId>,
}

impl OpenDraftSelectorController {
    #[must_use]
    pub fn new(registry: &OpenDraftsRegistry, container: Size) -> Self {
        Self {
            registry: registry.clone(),
            container,
            draft_ids: registry.ids(),
            layout: StackLayout::new(LayoutMode::AllDrafts),
            snapshots: SnapshotStore::new(),
            arbiter: DragArbiter::new(DragArbiterConfig::default()),
            cover_active: false,
            deferred_removals: Vec::new(),
        }
    }

    // ---------- Accessors ----------

    /// Presenter placeholder plus one item per draft.
    #[must_use]
    pub fn item_count(&self) -> usize {
        1 + self.draft_ids.len()
    }

    #[must_use]
    pub fn draft_ids(&self) -> &[DraftId] {
        &self.draft_ids
    }

    #[must_use]
    pub fn layout_mode(&self) -> LayoutMode {
        self.layout.mode
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout.mode = mode;
    }

    #[must_use]
    pub fn panned_item(&self) -> Option<PannedItem> {
        self.layout.panned
    }

    #[must_use]
    pub fn cover_active(&self) -> bool {
        self.cover_active
    }

    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    // ---------- Layout ----------

    #[must_use]
    pub fn layout_solution(&self) -> LayoutSolution {
        self.layout.solve(self.item_count(), self.container)
    }

    /// Re-copy the registry order. Call after external mutations, and once
    /// after restoration.
    pub fn reload_from_registry(&mut self) {
        self.draft_ids = self.registry.ids();
        debug!(count = self.draft_ids.len(), "selector reloaded");
    }

    /// Capture any snapshots still missing at the current size.
    pub fn capture_snapshots<S: SnapshotSource>(&mut self, source: &mut S) {
        let count = self.item_count();
        self.snapshots
            .ensure_captured(source, count, self.container);
    }

    pub fn container_did_resize(&mut self, container: Size) {
        self.container = container;
        self.snapshots.container_did_resize(container);
    }

    /// Fade duration owed to freshly recaptured snapshots, if any.
    pub fn take_pending_snapshot_fade(&mut self) -> Option<std::time::Duration> {
        self.snapshots.take_pending_fade()
    }

    // ---------- Selection ----------

    /// A tap on item `index`.
    pub fn select(&mut self, index: usize) -> SelectionOutcome {
        assert!(
            index < self.item_count(),
            "selected item {index} out of range for {} items",
            self.item_count()
        );
        if index == 0 {
            return SelectionOutcome::Dismiss;
        }
        let target = self.draft_ids[index - 1].clone();
        debug!(%target, index, "swap to draft");
        self.layout.mode = LayoutMode::DraftSelected {
            selected_index: index,
        };
        self.cover_active = true;
        SelectionOutcome::SwapPresentation { target }
    }

    /// The swapped-in presentation completed; drop the cover snapshot and
    /// apply removals that arrived while it was up.
    pub fn swap_did_complete(&mut self) {
        self.cover_active = false;
        let deferred = std::mem::take(&mut self.deferred_removals);
        for id in deferred {
            self.apply_removal(&id);
        }
    }

    /// A draft was closed outside the picker. Applied immediately, or
    /// deferred while a swap cover is up.
    pub fn note_draft_closed(&mut self, id: &DraftId) {
        if self.cover_active {
            self.deferred_removals.push(id.clone());
            return;
        }
        self.apply_removal(id);
    }

    fn apply_removal(&mut self, id: &DraftId) {
        let Some(pos) = self.draft_ids.iter().position(|d| d == id) else {
            return;
        };
        self.draft_ids.remove(pos);
        self.snapshots.remove(pos + 1);
    }

    // ---------- Swipe-to-delete ----------

    /// A pan update on the card at `item_index`.
    pub fn handle_card_pan(
        &mut self,
        item_index: usize,
        gesture: PanGesture,
        now: Instant,
    ) -> CardPanOutcome {
        match gesture.phase {
            PanPhase::Began => {
                if self.layout.mode != LayoutMode::AllDrafts
                    || item_index == 0
                    || item_index >= self.item_count()
                    || !is_horizontal(gesture.velocity)
                {
                    return CardPanOutcome::Ignored;
                }
                if self.layout.panned.is_some() {
                    warn!("card pan began with another pan live");
                    return CardPanOutcome::Ignored;
                }
                self.arbiter.touch(now);
                self.layout.panned = Some(PannedItem {
                    index: item_index,
                    translation: gesture.translation,
                });
                CardPanOutcome::Updated
            }
            PanPhase::Changed => {
                let Some(panned) = self.layout.panned.as_mut() else {
                    return CardPanOutcome::Ignored;
                };
                if panned.index != item_index {
                    return CardPanOutcome::Ignored;
                }
                panned.translation = gesture.translation;
                self.arbiter.touch(now);
                CardPanOutcome::Updated
            }
            PanPhase::Cancelled => {
                if self.clear_pan(item_index) {
                    CardPanOutcome::SnappedBack
                } else {
                    CardPanOutcome::Ignored
                }
            }
            PanPhase::Ended => {
                let Some(panned) = self.layout.panned.filter(|p| p.index == item_index) else {
                    return CardPanOutcome::Ignored;
                };
                let commit = self.arbiter.should_delete(
                    panned.translation.x,
                    gesture.velocity.x,
                    self.container.width,
                    now,
                );
                if !commit {
                    self.clear_pan(item_index);
                    return CardPanOutcome::SnappedBack;
                }
                self.commit_delete(item_index)
            }
        }
    }

    fn commit_delete(&mut self, item_index: usize) -> CardPanOutcome {
        // Solve once more at the old count with the deletion flag up; the
        // cached target slides the card fully off-screen.
        self.layout.deleting_panned_item = true;
        let disappearing_target = self
            .layout
            .solve(self.item_count(), self.container)
            .panned_target;
        self.layout.deleting_panned_item = false;
        self.layout.panned = None;
        self.arbiter.reset();

        let id = self.draft_ids.remove(item_index - 1);
        self.snapshots.remove(item_index);
        self.registry.remove(&id);
        debug!(%id, item_index, "card deleted");

        if self.draft_ids.is_empty() {
            CardPanOutcome::PickerShouldDismiss {
                disappearing_target,
            }
        } else {
            CardPanOutcome::Deleted {
                item_index,
                disappearing_target,
            }
        }
    }

    fn clear_pan(&mut self, item_index: usize) -> bool {
        let matched = self.layout.panned.is_some_and(|p| p.index == item_index);
        if matched {
            self.layout.panned = None;
            self.arbiter.reset();
        }
        matched
    }

    // ---------- Persistence ----------

    /// Serialize the draft order for process-state restoration.
    #[must_use]
    pub fn save(&self) -> PickerSnapshot {
        PickerSnapshot {
            draft_ids: self.draft_ids.clone(),
        }
    }

    /// Restore a saved order, keeping only drafts the registry still has.
    /// One reload, no per-item churn.
    pub fn restore(&mut self, snapshot: &PickerSnapshot) {
        let live = self.registry.ids();
        self.draft_ids = snapshot
            .draft_ids
            .iter()
            .filter(|id| live.contains(id))
            .cloned()
            .collect();
        self.snapshots.clear();
        debug!(count = self.draft_ids.len(), "selector restored");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
