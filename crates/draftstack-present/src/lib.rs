#![forbid(unsafe_code)]

//! Custom modal presentation of drafts with interactive minimize.
//!
//! This crate carries the presentation half of the stacked-drafts system:
//! the open-drafts registry, the minimized-drafts indicator model, the
//! presentation controller, and the headless transition drivers that
//! animate a draft between its presented frame and its docked sliver.
//!
//! Everything here is host-agnostic. The host owns real views, gesture
//! recognizers, and a frame clock; this crate owns the choreography and
//! tells the host what each frame should look like.
//!
//! # Invariants
//!
//! - The registry is the single source of truth for which drafts are open;
//!   it mutates only through explicit calls and presentation events
//! - Controllers are single-use and single-session
//! - All timing flows in through `Instant`/`Duration` parameters; nothing
//!   reads a clock internally

pub mod controller;
pub mod events;
pub mod handle;
pub mod indicator;
pub mod interactive;
pub mod registry;
pub mod transition;

pub use controller::{
    DraftPresentationController, HeaderOverlay, PanOutcome, PresentationPhase,
    SimulatedPresentingView,
};
pub use events::{PresentationEvent, RegistryChange};
pub use handle::{
    DraftHandle, DraftId, GestureAttachment, HostScreen, PackedColor, ScreenChrome, SurfaceRef,
};
pub use indicator::{IndicatorState, OpenDraftsIndicatorModel};
pub use interactive::{InteractiveDismissal, SessionState};
pub use registry::{OpenDraftsRegistry, PresentDraftAction, RegistrySnapshot};
pub use transition::{
    AnimatedTransition, DismissalConfig, DraftDismissal, SingleDraftPresentation,
    TransitionContext, TransitionDriver, ViewState,
};
