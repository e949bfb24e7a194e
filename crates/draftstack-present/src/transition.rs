#![forbid(unsafe_code)]

//! View-state transitions for presenting and dismissing a single draft.
//!
//! Transitions are strategy objects over a [`TransitionContext`]: they
//! never touch host views directly, they mutate the context's
//! [`ViewState`]s and the host mirrors those onto real views each frame.
//! A [`TransitionDriver`] advances them, either on a timer or under an
//! interactive gesture.
//!
//! # Invariants
//!
//! - `TransitionContext::complete` is called exactly once per run
//! - A cancelled presentation leaves the new view detached; a cancelled
//!   dismissal leaves the old view attached, frame restored

use draftstack_core::animation::{AnimationTimer, Easing};
use draftstack_core::geometry::{Rect, Size};
use draftstack_core::metrics::{LEGACY_HACK_DURATION, TRANSITION_DURATION, presenter_transform};
use draftstack_core::transform::Transform3D;
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// View State
// ============================================================================

/// Headless stand-in for a host view during a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub frame: Rect,
    pub transform: Transform3D,
    pub alpha: f32,
    /// Whether the view is in the screen hierarchy.
    pub attached: bool,
}

impl ViewState {
    #[must_use]
    pub fn attached(frame: Rect) -> Self {
        Self {
            frame,
            transform: Transform3D::identity(),
            alpha: 1.0,
            attached: true,
        }
    }

    #[must_use]
    pub fn detached(frame: Rect) -> Self {
        Self {
            attached: false,
            ..Self::attached(frame)
        }
    }
}

// ============================================================================
// Transition Context
// ============================================================================

/// The shared state a transition mutates: the outgoing view, the incoming
/// view, and the completion flag.
#[derive(Debug)]
pub struct TransitionContext {
    pub container: Size,
    pub from: ViewState,
    pub to: ViewState,
    completed: Option<bool>,
}

impl TransitionContext {
    #[must_use]
    pub fn new(container: Size, from: ViewState, to: ViewState) -> Self {
        Self {
            container,
            from,
            to,
            completed: None,
        }
    }

    /// Report the outcome to the host. Must be called exactly once.
    pub fn complete(&mut self, success: bool) {
        if self.completed.is_some() {
            warn!(success, "transition completed twice; second outcome dropped");
            debug_assert!(false, "transition completed twice");
            return;
        }
        debug!(success, "transition complete");
        self.completed = Some(success);
    }

    /// The reported outcome, once the transition has finished.
    #[must_use]
    pub fn completion(&self) -> Option<bool> {
        self.completed
    }
}

// ============================================================================
// Dismissal Config
// ============================================================================

/// Dismissal tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DismissalConfig {
    /// Reproduce the old-host workaround that ran interactive completions
    /// at a near-instant duration and compensated with completion speed.
    /// Off unless targeting that host baseline.
    pub legacy_completion_workaround: bool,
}

impl DismissalConfig {
    /// Duration used when an interactive session drives the dismissal.
    #[must_use]
    pub fn interactive_duration(&self) -> Duration {
        if self.legacy_completion_workaround {
            LEGACY_HACK_DURATION
        } else {
            TRANSITION_DURATION
        }
    }

    /// Completion-speed multiplier compensating for the shortened
    /// interactive duration; 1.0 when the workaround is off.
    #[must_use]
    pub fn interactive_completion_speed(&self) -> f32 {
        self.interactive_duration().as_secs_f32() / TRANSITION_DURATION.as_secs_f32()
    }
}

// ============================================================================
// Transition trait and driver
// ============================================================================

/// A presentation or dismissal strategy.
pub trait AnimatedTransition {
    fn duration(&self) -> Duration;
    fn easing(&self) -> Easing;
    /// Stage initial view state. Called once before the first `apply`.
    fn prepare(&mut self, ctx: &mut TransitionContext);
    /// Apply eased progress `t` in [0, 1].
    fn apply(&mut self, ctx: &mut TransitionContext, t: f32);
    /// Settle final view state and report the outcome on `ctx`.
    fn finish(&mut self, ctx: &mut TransitionContext, completed: bool);
}

#[derive(Debug)]
enum DriverState {
    Idle,
    Animating(AnimationTimer),
    /// Gesture-driven; progress comes from the session percent.
    Interactive {
        percent: f32,
    },
    /// Post-release settle toward commit (1.0) or cancel (0.0).
    Settling {
        timer: AnimationTimer,
        start: f32,
        target: f32,
        commit: bool,
    },
    Done,
}

/// Drives one transition to completion, timed or interactive.
pub struct TransitionDriver {
    transition: Box<dyn AnimatedTransition>,
    state: DriverState,
}

impl std::fmt::Debug for TransitionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionDriver")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TransitionDriver {
    #[must_use]
    pub fn new(transition: Box<dyn AnimatedTransition>) -> Self {
        Self {
            transition,
            state: DriverState::Idle,
        }
    }

    /// Start a timed run.
    pub fn begin(&mut self, ctx: &mut TransitionContext) {
        debug_assert!(matches!(self.state, DriverState::Idle), "driver reused");
        self.transition.prepare(ctx);
        self.transition.apply(ctx, 0.0);
        let timer = AnimationTimer::new(self.transition.duration(), self.transition.easing());
        self.state = DriverState::Animating(timer);
    }

    /// Start an interactive run; progress comes from `set_percent`.
    pub fn begin_interactive(&mut self, ctx: &mut TransitionContext) {
        debug_assert!(matches!(self.state, DriverState::Idle), "driver reused");
        self.transition.prepare(ctx);
        self.transition.apply(ctx, 0.0);
        self.state = DriverState::Interactive { percent: 0.0 };
    }

    /// Track the gesture. Progress applies linearly, matching the 1:1
    /// finger-tracking expectation.
    pub fn set_percent(&mut self, ctx: &mut TransitionContext, percent: f32) {
        match &mut self.state {
            DriverState::Interactive { percent: p } => {
                *p = percent.clamp(0.0, 1.0);
                let p = *p;
                self.transition.apply(ctx, p);
            }
            _ => warn!("set_percent outside interactive tracking ignored"),
        }
    }

    /// Release the gesture: settle toward commit or cancel over the
    /// remaining distance, sped up by `completion_speed`.
    pub fn end_interactive(&mut self, commit: bool, completion_speed: f32, easing: Easing) {
        let percent = match &self.state {
            DriverState::Interactive { percent } => *percent,
            _ => {
                warn!("end_interactive outside interactive tracking ignored");
                return;
            }
        };
        let target = if commit { 1.0 } else { 0.0 };
        let remaining = (target - percent).abs();
        let speed = completion_speed.max(f32::EPSILON);
        let duration = self.transition.duration().mul_f32(remaining / speed);
        self.state = DriverState::Settling {
            timer: AnimationTimer::new(duration, easing),
            start: percent,
            target,
            commit,
        };
    }

    /// Advance a timed or settling run. Returns `Some(completed)` on the
    /// tick that finishes the transition.
    pub fn tick(&mut self, ctx: &mut TransitionContext, delta: Duration) -> Option<bool> {
        match &mut self.state {
            DriverState::Animating(timer) => {
                let finished = timer.tick(delta);
                let t = timer.eased_progress();
                self.transition.apply(ctx, t);
                if finished {
                    self.transition.finish(ctx, true);
                    self.state = DriverState::Done;
                    return Some(true);
                }
                None
            }
            DriverState::Settling {
                timer,
                start,
                target,
                commit,
            } => {
                let finished = timer.tick(delta);
                let t = *start + (*target - *start) * timer.eased_progress();
                let commit = *commit;
                self.transition.apply(ctx, t);
                if finished {
                    self.transition.finish(ctx, commit);
                    self.state = DriverState::Done;
                    return Some(commit);
                }
                None
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.state, DriverState::Done)
    }
}

// ============================================================================
// Single draft presentation
// ============================================================================

/// Presents a draft: the new screen rises from its peeking position at the
/// bottom while the presenter shrinks behind it.
pub struct SingleDraftPresentation {
    final_frame: Rect,
    /// Indicator height the incoming frame starts peeked above; zero on a
    /// first presentation.
    presentation_inset: f32,
    initial_frame: Rect,
    from_initial_transform: Transform3D,
    from_target_transform: Transform3D,
}

impl SingleDraftPresentation {
    #[must_use]
    pub fn new(final_frame: Rect, presentation_inset: f32) -> Self {
        Self {
            final_frame,
            presentation_inset,
            initial_frame: Rect::ZERO,
            from_initial_transform: Transform3D::identity(),
            from_target_transform: Transform3D::identity(),
        }
    }
}

impl AnimatedTransition for SingleDraftPresentation {
    fn duration(&self) -> Duration {
        TRANSITION_DURATION
    }

    fn easing(&self) -> Easing {
        Easing::EaseOut
    }

    fn prepare(&mut self, ctx: &mut TransitionContext) {
        self.initial_frame = Rect::new(
            self.final_frame.min_x(),
            self.final_frame.max_y() - self.presentation_inset,
            self.final_frame.size.width,
            self.final_frame.size.height,
        );
        self.from_initial_transform = ctx.from.transform;
        self.from_target_transform = presenter_transform(ctx.from.frame.size.height);
        ctx.to.attached = true;
        ctx.to.frame = self.initial_frame;
    }

    fn apply(&mut self, ctx: &mut TransitionContext, t: f32) {
        ctx.to.frame = Rect::lerp(self.initial_frame, self.final_frame, t);
        ctx.from.transform = Transform3D::lerp(
            &self.from_initial_transform,
            &self.from_target_transform,
            t,
        );
    }

    fn finish(&mut self, ctx: &mut TransitionContext, completed: bool) {
        ctx.from.transform = self.from_initial_transform;
        if completed {
            ctx.from.attached = false;
            ctx.to.frame = self.final_frame;
        } else {
            ctx.to.attached = false;
        }
        ctx.complete(completed);
    }
}

// ============================================================================
// Draft dismissal
// ============================================================================

/// Dismisses a draft: the screen slides down to the indicator dock (or
/// fully off-screen on a close) while the presenter grows back.
pub struct DraftDismissal {
    /// Indicator height the frame docks onto; zero when closing for good.
    dismissal_inset: f32,
    /// Whether a gesture session drives this run.
    interactive: bool,
    config: DismissalConfig,
    initial_frame: Rect,
    final_frame: Rect,
    to_initial_transform: Transform3D,
    to_start_transform: Transform3D,
}

impl DraftDismissal {
    #[must_use]
    pub fn new(dismissal_inset: f32, interactive: bool, config: DismissalConfig) -> Self {
        Self {
            dismissal_inset,
            interactive,
            config,
            initial_frame: Rect::ZERO,
            final_frame: Rect::ZERO,
            to_initial_transform: Transform3D::identity(),
            to_start_transform: Transform3D::identity(),
        }
    }

    #[must_use]
    pub fn config(&self) -> DismissalConfig {
        self.config
    }
}

impl AnimatedTransition for DraftDismissal {
    fn duration(&self) -> Duration {
        if self.interactive {
            self.config.interactive_duration()
        } else {
            TRANSITION_DURATION
        }
    }

    fn easing(&self) -> Easing {
        if self.interactive {
            Easing::Linear
        } else {
            Easing::EaseInOut
        }
    }

    fn prepare(&mut self, ctx: &mut TransitionContext) {
        self.initial_frame = ctx.from.frame;
        self.final_frame = Rect::new(
            self.initial_frame.min_x(),
            self.initial_frame.max_y() - self.dismissal_inset,
            self.initial_frame.size.width,
            self.initial_frame.size.height,
        );
        self.to_initial_transform = ctx.to.transform;
        self.to_start_transform = presenter_transform(ctx.to.frame.size.height);
        ctx.to.attached = true;
        ctx.to.transform = self.to_start_transform;
    }

    fn apply(&mut self, ctx: &mut TransitionContext, t: f32) {
        ctx.from.frame = Rect::lerp(self.initial_frame, self.final_frame, t);
        ctx.to.transform =
            Transform3D::lerp(&self.to_start_transform, &self.to_initial_transform, t);
    }

    fn finish(&mut self, ctx: &mut TransitionContext, completed: bool) {
        ctx.to.transform = self.to_initial_transform;
        if completed {
            ctx.from.attached = false;
        } else {
            ctx.from.frame = self.initial_frame;
        }
        ctx.complete(completed);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
