#![forbid(unsafe_code)]

//! Animation timing: easing curves, a tick-driven timer, and a join latch
//! for parallel animation groups.
//!
//! # Invariants
//!
//! - Timer progress is always in [0.0, 1.0]
//! - A [`CompletionLatch`] reports completion exactly once, after every
//!   expected participant has reported in
//!
//! # Failure Modes
//!
//! - Negative tick deltas are clamped to zero
//! - Zero-duration timers complete on the first tick

use std::time::Duration;

// ============================================================================
// Easing
// ============================================================================

/// Easing curve for transition timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation. Used while an interactive gesture drives
    /// progress directly.
    Linear,
    /// Accelerating (cubic).
    EaseIn,
    /// Decelerating (cubic) - the presentation default.
    #[default]
    EaseOut,
    /// Accelerate then decelerate (cubic).
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a linear progress value. Input is clamped to
    /// [0.0, 1.0].
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

// ============================================================================
// Animation Timer
// ============================================================================

/// A tick-driven animation clock.
///
/// Hosts call [`tick`](Self::tick) once per frame with the elapsed delta;
/// the timer exposes raw and eased progress.
#[derive(Debug, Clone)]
pub struct AnimationTimer {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl AnimationTimer {
    /// Create a timer. Zero durations are bumped to one nanosecond so the
    /// first tick completes instantly instead of dividing by zero.
    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: duration.max(Duration::from_nanos(1)),
            easing,
        }
    }

    /// Advance the clock. Returns `true` if this tick completed the timer.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.is_complete() {
            return false;
        }
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.is_complete()
    }

    /// Raw progress in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self) -> f32 {
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Progress with the easing curve applied.
    #[must_use]
    pub fn eased_progress(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Rewind to the start.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ============================================================================
// Completion Latch
// ============================================================================

/// Join latch for parallel animations that share one completion callback.
///
/// Each animation registers with [`expect_one`](Self::expect_one) before it
/// starts; each completion calls [`complete_one`](Self::complete_one). The
/// latch reports `true` from exactly one `complete_one` call, the one that
/// retires the final outstanding participant.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    outstanding: u32,
    fired: bool,
}

impl CompletionLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more participant. Must be called before that
    /// participant can complete.
    pub fn expect_one(&mut self) {
        debug_assert!(!self.fired, "latch reused after firing");
        self.outstanding += 1;
    }

    /// Record one participant finishing. Returns `true` exactly once, when
    /// the last outstanding participant completes.
    pub fn complete_one(&mut self) -> bool {
        debug_assert!(self.outstanding > 0, "complete_one without expect_one");
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }

    /// Number of participants still running.
    #[must_use]
    pub fn outstanding(&self) -> u32 {
        self.outstanding
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn easing_endpoints_fixed() {
        for e in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(Easing::EaseOut.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseOut.apply(1.5), 1.0);
    }

    #[test]
    fn ease_out_front_loads_motion() {
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
    }

    #[test]
    fn ease_in_out_symmetric_at_midpoint() {
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn timer_progress_monotonic() {
        let mut timer = AnimationTimer::new(MS_300, Easing::Linear);
        assert_eq!(timer.progress(), 0.0);
        assert!(!timer.tick(MS_100));
        let p1 = timer.progress();
        assert!(!timer.tick(MS_100));
        let p2 = timer.progress();
        assert!(p2 > p1);
        assert!(timer.tick(MS_100));
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn timer_completion_reported_once() {
        let mut timer = AnimationTimer::new(MS_100, Easing::Linear);
        assert!(timer.tick(MS_300));
        assert!(timer.is_complete());
        // Subsequent ticks do not re-report.
        assert!(!timer.tick(MS_50));
    }

    #[test]
    fn timer_zero_duration_completes_first_tick() {
        let mut timer = AnimationTimer::new(Duration::ZERO, Easing::Linear);
        assert!(timer.tick(Duration::from_nanos(1)));
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn timer_reset_rewinds() {
        let mut timer = AnimationTimer::new(MS_100, Easing::EaseOut);
        timer.tick(MS_300);
        timer.reset();
        assert_eq!(timer.progress(), 0.0);
        assert!(!timer.is_complete());
    }

    #[test]
    fn latch_fires_after_all_complete() {
        let mut latch = CompletionLatch::new();
        latch.expect_one();
        latch.expect_one();
        assert!(!latch.complete_one());
        assert!(latch.complete_one());
    }

    #[test]
    fn latch_interleaved_registration() {
        // A participant registered after others finished still holds the
        // latch open.
        let mut latch = CompletionLatch::new();
        latch.expect_one();
        latch.expect_one();
        assert!(!latch.complete_one());
        latch.expect_one();
        assert!(!latch.complete_one());
        assert!(latch.complete_one());
    }

    #[test]
    fn latch_order_independent() {
        // Three participants finishing in any order fire on the third.
        let mut latch = CompletionLatch::new();
        for _ in 0..3 {
            latch.expect_one();
        }
        assert!(!latch.complete_one());
        assert!(!latch.complete_one());
        assert_eq!(latch.outstanding(), 1);
        assert!(latch.complete_one());
    }
}
