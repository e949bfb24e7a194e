#![forbid(unsafe_code)]

//! The stacked-card picker over minimized drafts.
//!
//! When more than one draft is minimized, tapping the indicator opens this
//! picker instead of re-presenting a single draft. It lays the drafts out
//! as a tilted perspective stack over a snapshot of the presenting screen,
//! supports swipe-to-delete on any card, and swaps the active presentation
//! when a card is tapped.
//!
//! # Invariants
//!
//! - The picker renders from snapshots, never live screens
//! - Item 0 always means "return to presenter"
//! - Deleting the last draft dismisses the picker rather than showing an
//!   empty stack

pub mod controller;
pub mod snapshot;
pub mod transitions;

pub use controller::{
    CardPanOutcome, OpenDraftSelectorController, PickerSnapshot, SelectionOutcome,
};
pub use snapshot::{Snapshot, SnapshotSource, SnapshotStore};
pub use transitions::{PickerTransition, PickerTransitionKind};
