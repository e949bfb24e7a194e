#![forbid(unsafe_code)]

//! Draftstack public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use draftstack_core::animation::{AnimationTimer, CompletionLatch, Easing};
pub use draftstack_core::geometry::{EdgeInsets, Point, Rect, Size};
pub use draftstack_core::gesture::{
    DragArbiter, DragArbiterConfig, PanGesture, PanPhase, is_horizontal,
};
pub use draftstack_core::observer::{ObserverList, Subscription};
pub use draftstack_core::transform::Transform3D;

// --- Layout re-exports -----------------------------------------------------

pub use draftstack_layout::attributes::{LayoutAttributes, LayoutMode, PannedItem};
pub use draftstack_layout::stack::{LayoutSolution, StackLayout};

// --- Presentation re-exports -----------------------------------------------

pub use draftstack_present::{
    DismissalConfig, DraftDismissal, DraftHandle, DraftId, DraftPresentationController,
    GestureAttachment, HostScreen, IndicatorState, InteractiveDismissal, OpenDraftsIndicatorModel,
    OpenDraftsRegistry, PanOutcome, PresentDraftAction, PresentationEvent, PresentationPhase,
    RegistryChange, RegistrySnapshot, ScreenChrome, SingleDraftPresentation, SurfaceRef,
    TransitionContext, TransitionDriver, ViewState,
};

// --- Picker re-exports -----------------------------------------------------

pub use draftstack_picker::{
    CardPanOutcome, OpenDraftSelectorController, PickerSnapshot, PickerTransition,
    PickerTransitionKind, SelectionOutcome, Snapshot, SnapshotSource, SnapshotStore,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DraftHandle, DraftId, DraftPresentationController, HostScreen, LayoutMode,
        OpenDraftSelectorController, OpenDraftsIndicatorModel, OpenDraftsRegistry, PanGesture,
        PanPhase, PresentDraftAction, PresentationEvent, Rect, ScreenChrome, Size, StackLayout,
    };

    pub use crate::{core, layout, picker, present};
}

pub use draftstack_core as core;
pub use draftstack_layout as layout;
pub use draftstack_picker as picker;
pub use draftstack_present as present;
