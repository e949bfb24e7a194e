#![forbid(unsafe_code)]

//! Percent-driven interactive dismissal session.
//!
//! One session exists per in-flight interactive dismissal: the gesture
//! updates its percent while tracking, then either finishes (the draft
//! minimizes) or cancels (the draft snaps back). Both outcomes are
//! terminal.

use draftstack_core::animation::Easing;
use tracing::warn;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The finger drives progress directly.
    Tracking,
    /// Committed; the remainder animates to completion.
    Finished,
    /// Aborted; progress animates back to zero.
    Cancelled,
}

/// A percent-driven dismissal in flight.
#[derive(Debug, Clone)]
pub struct InteractiveDismissal {
    percent: f32,
    state: SessionState,
    /// Speed multiplier for the post-release completion animation. 1.0
    /// except under the legacy completion workaround.
    completion_speed: f32,
    completion_easing: Easing,
}

impl Default for InteractiveDismissal {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveDismissal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            state: SessionState::Tracking,
            completion_speed: 1.0,
            completion_easing: Easing::EaseOut,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn percent(&self) -> f32 {
        self.percent
    }

    #[must_use]
    pub fn completion_speed(&self) -> f32 {
        self.completion_speed
    }

    #[must_use]
    pub fn completion_easing(&self) -> Easing {
        self.completion_easing
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state != SessionState::Tracking
    }

    /// Update tracking progress. Ignored with a warning once terminal.
    pub fn update(&mut self, percent: f32) {
        if self.is_terminal() {
            warn!(state = ?self.state, "percent update on terminal session ignored");
            return;
        }
        self.percent = percent.clamp(0.0, 1.0);
    }

    /// Commit: the remaining distance animates to completion with the
    /// given ease and speed.
    pub fn finish(&mut self, completion_speed: f32, completion_easing: Easing) {
        if self.is_terminal() {
            warn!(state = ?self.state, "finish on terminal session ignored");
            return;
        }
        self.completion_speed = completion_speed;
        self.completion_easing = completion_easing;
        self.state = SessionState::Finished;
    }

    /// Abort: progress animates back to zero.
    pub fn cancel(&mut self, completion_speed: f32) {
        if self.is_terminal() {
            warn!(state = ?self.state, "cancel on terminal session ignored");
            return;
        }
        self.completion_speed = completion_speed;
        self.state = SessionState::Cancelled;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
