#![forbid(unsafe_code)]

//! The draft presentation controller.
//!
//! One controller instance manages one presentation, start to finish:
//! staging the chrome (header overlay, accessibility dismiss strip,
//! simulated presenting view), deciding the docking insets, and turning
//! pan gestures into an interactive dismissal session. Controllers are
//! one-shot; re-presenting a draft constructs a new one.
//!
//! # Invariants
//!
//! - Phases only move forward, except a cancelled dismissal which returns
//!   to `Presented`
//! - At most one interactive session exists at a time
//! - `should_minimize` resets to `false` every time presentation begins
//!
//! # Failure Modes
//!
//! - Operations called in the wrong phase log a warning and do nothing;
//!   layout state is never advanced from an inconsistent phase

use crate::events::PresentationEvent;
use crate::handle::{GestureAttachment, HostScreen, PackedColor, ScreenChrome};
use crate::interactive::InteractiveDismissal;
use crate::registry::OpenDraftsRegistry;
use crate::transition::{DismissalConfig, DraftDismissal, SingleDraftPresentation, ViewState};
use draftstack_core::animation::Easing;
use draftstack_core::geometry::{Rect, Size};
use draftstack_core::gesture::{DragArbiter, DragArbiterConfig, PanGesture, PanPhase};
use draftstack_core::metrics::{
    ACCESSIBILITY_DISMISS_HEIGHT, HEADER_OVERLAY_HEIGHT, presented_insets,
    visible_indicator_height,
};
use draftstack_core::observer::ObserverList;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

// ============================================================================
// Phase
// ============================================================================

/// Lifecycle phase of a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationPhase {
    #[default]
    Idle,
    Presenting,
    Presented,
    Dismissing,
    Dismissed,
}

impl PresentationPhase {
    /// Whether the presented content is on screen in some form.
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Presenting | Self::Presented | Self::Dismissing)
    }
}

// ============================================================================
// Chrome models
// ============================================================================

/// The title bar cross-faded over a draft while it minimizes or reopens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderOverlay {
    pub title: Option<String>,
    pub alpha: f32,
    pub frame: Rect,
    pub attached: bool,
}

/// Stand-in for the presenting screen, shown behind a presented draft so
/// only its top sliver needs to look right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedPresentingView {
    pub background: PackedColor,
    /// Bar color when the presenter was a navigation container with a
    /// visible bar.
    pub nav_bar: Option<PackedColor>,
}

impl SimulatedPresentingView {
    fn for_chrome(chrome: ScreenChrome) -> Self {
        match chrome {
            ScreenChrome::Plain { background } => Self {
                background,
                nav_bar: None,
            },
            ScreenChrome::NavigationBar {
                background,
                bar_background,
                bar_hidden,
            } => Self {
                background,
                nav_bar: (!bar_hidden).then_some(bar_background),
            },
        }
    }
}

/// What the host must do in response to a pan gesture update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// Start an interactive dismissal: call
    /// [`DraftPresentationController::begin_dismissal`] and drive the
    /// dismissal transition from the session percent.
    BeginDismissal,
    /// Tracking continues at the given percent.
    Updated { percent: f32 },
    /// The release committed; settle the transition to completion.
    Commit { completion_speed: f32 },
    /// The gesture cancelled or the release did not commit; settle back.
    Cancel { completion_speed: f32 },
    /// No active session or unusable phase.
    Ignored,
}

// ============================================================================
// Controller
// ============================================================================

/// Manages one custom draft presentation.
pub struct DraftPresentationController {
    screen: HostScreen,
    container: Size,
    registry: OpenDraftsRegistry,
    events: ObserverList<PresentationEvent>,
    config: DismissalConfig,

    phase: PresentationPhase,
    should_minimize: bool,
    has_been_presented: bool,

    session: Option<InteractiveDismissal>,
    arbiter: DragArbiter,

    wrapping_view: ViewState,
    header_overlay: HeaderOverlay,
    simulated_presenting_view: Option<SimulatedPresentingView>,
}

impl std::fmt::Debug for DraftPresentationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftPresentationController")
            .field("screen", &self.screen)
            .field("phase", &self.phase)
            .field("should_minimize", &self.should_minimize)
            .field("has_been_presented", &self.has_been_presented)
            .finish_non_exhaustive()
    }
}

impl DraftPresentationController {
    #[must_use]
    pub fn new(
        screen: HostScreen,
        container: Size,
        registry: &OpenDraftsRegistry,
        events: ObserverList<PresentationEvent>,
        config: DismissalConfig,
    ) -> Self {
        Self {
            screen,
            container,
            registry: registry.clone(),
            events,
            config,
            phase: PresentationPhase::Idle,
            should_minimize: false,
            has_been_presented: false,
            session: None,
            arbiter: DragArbiter::new(DragArbiterConfig::default()),
            wrapping_view: ViewState::detached(Rect::ZERO),
            header_overlay: HeaderOverlay::default(),
            simulated_presenting_view: None,
        }
    }

    // ---------- Accessors ----------

    #[must_use]
    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    #[must_use]
    pub fn should_minimize(&self) -> bool {
        self.should_minimize
    }

    #[must_use]
    pub fn has_been_presented(&self) -> bool {
        self.has_been_presented
    }

    #[must_use]
    pub fn screen(&self) -> &HostScreen {
        &self.screen
    }

    #[must_use]
    pub fn session(&self) -> Option<&InteractiveDismissal> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn wrapping_view(&self) -> &ViewState {
        &self.wrapping_view
    }

    #[must_use]
    pub fn header_overlay(&self) -> &HeaderOverlay {
        &self.header_overlay
    }

    #[must_use]
    pub fn simulated_presenting_view(&self) -> Option<SimulatedPresentingView> {
        self.simulated_presenting_view
    }

    /// Where the dismissal gesture should attach once presentation ends.
    #[must_use]
    pub fn gesture_attachment(&self) -> Option<GestureAttachment> {
        self.screen.gesture_attachment()
    }

    // ---------- Geometry ----------

    /// Final frame of the presented draft: the container minus the fixed
    /// top inset.
    #[must_use]
    pub fn frame_of_presented_view(&self) -> Rect {
        Rect::from_size(self.container).inset(presented_insets())
    }

    /// Strip above the presented draft that acts as an assistive-tech
    /// minimize button.
    #[must_use]
    pub fn accessibility_dismissal_frame(&self) -> Rect {
        let presented = self.frame_of_presented_view();
        Rect::new(
            presented.min_x(),
            presented.min_y() - ACCESSIBILITY_DISMISS_HEIGHT,
            presented.size.width,
            ACCESSIBILITY_DISMISS_HEIGHT,
        )
    }

    /// Accessibility label for the dismiss strip.
    #[must_use]
    pub fn accessibility_dismissal_label(&self) -> &'static str {
        "Minimize draft"
    }

    /// Inset the incoming frame starts peeked above: the indicator height,
    /// once the draft has been presented before.
    #[must_use]
    pub fn presentation_inset(&self) -> f32 {
        if self.has_been_presented && self.screen.is_draft() {
            visible_indicator_height(self.registry.count())
        } else {
            0.0
        }
    }

    /// Inset the outgoing frame docks onto: the indicator height when
    /// minimizing, zero on a full close.
    #[must_use]
    pub fn dismissal_inset(&self) -> f32 {
        if self.should_minimize && self.screen.is_draft() {
            visible_indicator_height(self.registry.count())
        } else {
            0.0
        }
    }

    /// Keep the presenting screen's bounds pinned to the container across
    /// layout passes; the shrink lives in its transform, not its bounds.
    pub fn container_did_layout(&mut self, container: Size) {
        self.container = container;
        if self.phase.is_visible() {
            self.wrapping_view.frame = self.frame_of_presented_view();
        }
    }

    // ---------- Presentation ----------

    /// Mark the draft as previously presented so the next presentation
    /// starts from the peeking position. Used when the host re-presents a
    /// lone minimized draft directly.
    pub fn mark_previously_presented(&mut self) {
        self.has_been_presented = true;
    }

    /// Build the presentation transition for this controller's state.
    #[must_use]
    pub fn make_presentation_transition(&self) -> SingleDraftPresentation {
        SingleDraftPresentation::new(self.frame_of_presented_view(), self.presentation_inset())
    }

    /// Build the dismissal transition; interactive when a session is live.
    #[must_use]
    pub fn make_dismissal_transition(&self) -> DraftDismissal {
        DraftDismissal::new(self.dismissal_inset(), self.session.is_some(), self.config)
    }

    /// Stage chrome for an incoming presentation.
    pub fn begin_presentation(&mut self) {
        if self.phase != PresentationPhase::Idle {
            warn!(phase = ?self.phase, "begin_presentation outside Idle ignored");
            return;
        }
        debug!(screen = ?self.screen, "presentation begins");
        self.phase = PresentationPhase::Presenting;
        self.should_minimize = false;
        self.wrapping_view = ViewState::attached(self.frame_of_presented_view());
        self.stage_header_overlay_if_needed(1.0);
    }

    /// Alongside animation hook: fades the header overlay out as the draft
    /// rises. `t` is the transition's eased progress.
    pub fn presentation_alongside(&mut self, t: f32) {
        if self.header_overlay.attached {
            self.header_overlay.alpha = 1.0 - t.clamp(0.0, 1.0);
        }
    }

    /// Presentation transition finished. Emits the did-present event and
    /// installs the simulated presenting view on success.
    pub fn presentation_did_end(&mut self, completed: bool) {
        if self.phase != PresentationPhase::Presenting {
            warn!(phase = ?self.phase, "presentation_did_end outside Presenting ignored");
            return;
        }
        self.header_overlay.attached = false;
        if completed {
            debug!("presentation completed");
            self.phase = PresentationPhase::Presented;
            self.has_been_presented = true;
            self.simulated_presenting_view =
                Some(SimulatedPresentingView::for_chrome(self.screen.chrome));
            if let Some(handle) = &self.screen.handle {
                self.events
                    .emit(&PresentationEvent::DidPresent(Rc::clone(handle)));
            }
        } else {
            debug!("presentation cancelled");
            self.phase = PresentationPhase::Dismissed;
            self.wrapping_view.attached = false;
        }
    }

    // ---------- Dismissal ----------

    /// Stage chrome for an outgoing dismissal. Emits the will-dismiss
    /// event when this is a close rather than a minimize.
    pub fn begin_dismissal(&mut self) {
        if self.phase != PresentationPhase::Presented {
            warn!(phase = ?self.phase, "begin_dismissal outside Presented ignored");
            return;
        }
        debug!(minimize = self.should_minimize, "dismissal begins");
        self.phase = PresentationPhase::Dismissing;
        self.simulated_presenting_view = None;
        if self.should_minimize {
            self.stage_header_overlay_if_needed(0.0);
        } else if let Some(handle) = &self.screen.handle {
            self.events
                .emit(&PresentationEvent::WillDismissNonInteractive(Rc::clone(
                    handle,
                )));
        }
    }

    /// Alongside animation hook: fades the header overlay in as the draft
    /// docks.
    pub fn dismissal_alongside(&mut self, t: f32) {
        if self.header_overlay.attached {
            self.header_overlay.alpha = t.clamp(0.0, 1.0);
        }
    }

    /// Dismissal transition finished. A cancelled dismissal returns to
    /// `Presented` with the simulated view re-installed.
    pub fn dismissal_did_end(&mut self, completed: bool) {
        if self.phase != PresentationPhase::Dismissing {
            warn!(phase = ?self.phase, "dismissal_did_end outside Dismissing ignored");
            return;
        }
        self.header_overlay.attached = false;
        if completed {
            debug!("dismissal completed");
            self.phase = PresentationPhase::Dismissed;
            self.wrapping_view.attached = false;
        } else {
            debug!("dismissal cancelled");
            self.phase = PresentationPhase::Presented;
            self.simulated_presenting_view =
                Some(SimulatedPresentingView::for_chrome(self.screen.chrome));
        }
    }

    /// Assistive activation of the dismiss strip: minimize the draft.
    /// Returns `true` when the host should start an animated dismissal.
    pub fn activate_accessibility_dismissal(&mut self) -> bool {
        if self.phase != PresentationPhase::Presented {
            return false;
        }
        self.should_minimize = true;
        true
    }

    // ---------- Interactive dismissal ----------

    /// Feed a pan gesture update from the draggable surface.
    pub fn handle_pan(&mut self, gesture: PanGesture, now: Instant) -> PanOutcome {
        match gesture.phase {
            PanPhase::Began => {
                if self.phase != PresentationPhase::Presented {
                    warn!(phase = ?self.phase, "pan began outside Presented ignored");
                    return PanOutcome::Ignored;
                }
                if self.session.is_some() {
                    warn!("pan began with a live session ignored");
                    return PanOutcome::Ignored;
                }
                self.arbiter.touch(now);
                self.should_minimize = true;
                self.session = Some(InteractiveDismissal::new());
                PanOutcome::BeginDismissal
            }
            PanPhase::Changed => {
                let denominator =
                    self.frame_of_presented_view().size.height - self.dismissal_inset();
                let Some(session) = self.session.as_mut() else {
                    return PanOutcome::Ignored;
                };
                self.arbiter.touch(now);
                let percent = (gesture.translation.y / denominator).clamp(0.0, 1.0);
                session.update(percent);
                PanOutcome::Updated { percent }
            }
            PanPhase::Cancelled => {
                let speed = self.config.interactive_completion_speed();
                let Some(mut session) = self.session.take() else {
                    return PanOutcome::Ignored;
                };
                session.cancel(speed);
                self.arbiter.reset();
                PanOutcome::Cancel {
                    completion_speed: speed,
                }
            }
            PanPhase::Ended => {
                let speed = self.config.interactive_completion_speed();
                let Some(mut session) = self.session.take() else {
                    return PanOutcome::Ignored;
                };
                let commit = self.arbiter.should_commit(gesture.velocity.y, now);
                self.arbiter.reset();
                if commit {
                    session.finish(speed, Easing::EaseOut);
                    PanOutcome::Commit {
                        completion_speed: speed,
                    }
                } else {
                    session.cancel(speed);
                    PanOutcome::Cancel {
                        completion_speed: speed,
                    }
                }
            }
        }
    }

    // ---------- Chrome ----------

    fn stage_header_overlay_if_needed(&mut self, alpha: f32) {
        let Some(handle) = &self.screen.handle else {
            return;
        };
        if !self.has_been_presented {
            return;
        }
        let presented = self.frame_of_presented_view();
        self.header_overlay = HeaderOverlay {
            title: handle.title(),
            alpha,
            frame: Rect::new(0.0, 0.0, presented.size.width, HEADER_OVERLAY_HEIGHT),
            attached: true,
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
