#![forbid(unsafe_code)]

//! Picker present and dismiss transitions.
//!
//! Both transitions run two animations in parallel: the stack layout
//! switch, and a secondary chrome fade (header buttons) that starts
//! slightly later so the two do not visually compete. Completion is joined
//! through a latch; the host's completion fires exactly once, after both
//! animations report done.
//!
//! # Invariants
//!
//! - `layout_progress` and `chrome_alpha` are pure functions of elapsed
//!   time since `begin`
//! - `tick` reports completion exactly once
//! - A cancelled presentation leaves the picker detached; a cancelled
//!   dismissal leaves it attached

use draftstack_core::animation::{AnimationTimer, CompletionLatch, Easing};
use draftstack_core::metrics::{
    PICKER_SECONDARY_FADE_DELAY, PICKER_SECONDARY_FADE_DURATION, TRANSITION_DURATION,
};
use draftstack_layout::attributes::LayoutMode;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Kind
// ============================================================================

/// Direction of the picker transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerTransitionKind {
    /// Indicator stack unfolds into the full card stack; chrome fades in.
    Present,
    /// Card stack folds back down onto the indicator; chrome fades out.
    Dismiss,
}

impl PickerTransitionKind {
    /// Layout mode the stack animates from.
    #[must_use]
    pub fn start_mode(self) -> LayoutMode {
        match self {
            Self::Present => LayoutMode::PresenterSelected,
            Self::Dismiss => LayoutMode::AllDrafts,
        }
    }

    /// Layout mode the stack animates to.
    #[must_use]
    pub fn end_mode(self) -> LayoutMode {
        match self {
            Self::Present => LayoutMode::AllDrafts,
            Self::Dismiss => LayoutMode::PresenterSelected,
        }
    }
}

// ============================================================================
// Transition
// ============================================================================

/// Drives one picker present or dismiss. The host resolves the start and
/// end layout solutions once, then interpolates attributes between them at
/// [`PickerTransition::layout_progress`] each frame.
#[derive(Debug)]
pub struct PickerTransition {
    kind: PickerTransitionKind,
    layout: AnimationTimer,
    chrome: AnimationTimer,
    chrome_delay_left: Duration,
    chrome_started: bool,
    latch: CompletionLatch,
    completed: Option<bool>,
}

impl PickerTransition {
    #[must_use]
    pub fn new(kind: PickerTransitionKind) -> Self {
        let mut latch = CompletionLatch::new();
        latch.expect_one();
        latch.expect_one();
        Self {
            kind,
            layout: AnimationTimer::new(TRANSITION_DURATION, Easing::EaseInOut),
            chrome: AnimationTimer::new(PICKER_SECONDARY_FADE_DURATION, Easing::EaseInOut),
            chrome_delay_left: PICKER_SECONDARY_FADE_DELAY,
            chrome_started: false,
            latch,
            completed: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PickerTransitionKind {
        self.kind
    }

    /// Eased progress of the layout switch, 0 at `start_mode` and 1 at
    /// `end_mode`.
    #[must_use]
    pub fn layout_progress(&self) -> f32 {
        self.layout.eased_progress()
    }

    /// Current alpha of the secondary chrome. Holds its start value until
    /// the delayed fade begins.
    #[must_use]
    pub fn chrome_alpha(&self) -> f32 {
        let fade = if self.chrome_started {
            self.chrome.eased_progress()
        } else {
            0.0
        };
        match self.kind {
            PickerTransitionKind::Present => fade,
            PickerTransitionKind::Dismiss => 1.0 - fade,
        }
    }

    #[must_use]
    pub fn completion(&self) -> Option<bool> {
        self.completed
    }

    /// Whether the picker's view belongs in the hierarchy given the
    /// transition's outcome so far.
    #[must_use]
    pub fn picker_attached(&self) -> bool {
        match (self.kind, self.completed) {
            // Mid-flight the picker is always on screen.
            (_, None) => true,
            (PickerTransitionKind::Present, Some(completed)) => completed,
            (PickerTransitionKind::Dismiss, Some(completed)) => !completed,
        }
    }

    /// Advance both animations. Returns `Some(true)` on the tick where the
    /// last of the two completes; `None` before and after.
    pub fn tick(&mut self, delta: Duration) -> Option<bool> {
        if self.completed.is_some() {
            return None;
        }
        if self.layout.tick(delta) && self.latch.complete_one() {
            return self.finish(true);
        }

        let mut chrome_delta = delta;
        if !self.chrome_started {
            if chrome_delta < self.chrome_delay_left {
                self.chrome_delay_left -= chrome_delta;
                return None;
            }
            chrome_delta -= self.chrome_delay_left;
            self.chrome_delay_left = Duration::ZERO;
            self.chrome_started = true;
            if chrome_delta.is_zero() {
                return None;
            }
        }
        if self.chrome.tick(chrome_delta) && self.latch.complete_one() {
            return self.finish(true);
        }
        None
    }

    /// Abort mid-flight. The attach state snaps to the cancelled outcome.
    pub fn cancel(&mut self) {
        if self.completed.is_some() {
            return;
        }
        self.finish(false);
    }

    fn finish(&mut self, completed: bool) -> Option<bool> {
        debug!(kind = ?self.kind, completed, "picker transition finished");
        self.completed = Some(completed);
        Some(completed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);

    fn run_to_completion(t: &mut PickerTransition) -> Option<bool> {
        for _ in 0..20 {
            if let Some(done) = t.tick(MS_50) {
                return Some(done);
            }
        }
        None
    }

    #[test]
    fn present_switches_indicator_stack_to_all_drafts() {
        let kind = PickerTransitionKind::Present;
        assert_eq!(kind.start_mode(), LayoutMode::PresenterSelected);
        assert_eq!(kind.end_mode(), LayoutMode::AllDrafts);
    }

    #[test]
    fn chrome_fade_starts_after_the_delay() {
        let mut t = PickerTransition::new(PickerTransitionKind::Present);
        assert_eq!(t.chrome_alpha(), 0.0);

        // 50ms: still inside the 100ms delay.
        t.tick(MS_50);
        assert_eq!(t.chrome_alpha(), 0.0);
        assert!(t.layout_progress() > 0.0);

        // 150ms total: fade has run for 50ms of its 200ms.
        t.tick(Duration::from_millis(100));
        let alpha = t.chrome_alpha();
        assert!(alpha > 0.0 && alpha < 1.0, "alpha {alpha}");
    }

    #[test]
    fn dismiss_fades_chrome_out() {
        let mut t = PickerTransition::new(PickerTransitionKind::Dismiss);
        assert_eq!(t.chrome_alpha(), 1.0);
        t.tick(Duration::from_millis(300));
        assert!(t.chrome_alpha() < 1.0);
    }

    #[test]
    fn completion_fires_once_after_both_animations() {
        let mut t = PickerTransition::new(PickerTransitionKind::Present);

        // At 250ms neither sub-animation is done: layout is 300ms, chrome
        // is a 100ms delay plus a 200ms fade.
        assert_eq!(t.tick(Duration::from_millis(250)), None);

        // Both finish on the same tick at 300ms; completion fires once.
        assert_eq!(t.tick(MS_50), Some(true));
        assert_eq!(t.layout_progress(), 1.0);
        assert_eq!(t.completion(), Some(true));
        assert_eq!(t.tick(MS_50), None);
    }

    #[test]
    fn cancelled_presentation_detaches_picker() {
        let mut t = PickerTransition::new(PickerTransitionKind::Present);
        assert!(t.picker_attached());
        t.tick(MS_50);
        t.cancel();
        assert_eq!(t.completion(), Some(false));
        assert!(!t.picker_attached());
    }

    #[test]
    fn cancelled_dismissal_keeps_picker_attached() {
        let mut t = PickerTransition::new(PickerTransitionKind::Dismiss);
        t.tick(MS_50);
        t.cancel();
        assert!(t.picker_attached());
    }

    #[test]
    fn completed_dismissal_detaches_picker() {
        let mut t = PickerTransition::new(PickerTransitionKind::Dismiss);
        assert_eq!(run_to_completion(&mut t), Some(true));
        assert!(!t.picker_attached());
    }
}
