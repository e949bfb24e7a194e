#![forbid(unsafe_code)]

//! Pan gesture primitives and drag arbitration.
//!
//! The arbiter answers the two commit questions a drag-driven dismissal
//! needs: "did this release mean *dismiss*?" and, in the card picker,
//! "did this release mean *delete*?". Both use a recency window: a flick
//! only counts if the finger moved within the window before release, so a
//! drag that stalls and then lifts is treated as a cancel.
//!
//! # Invariants
//!
//! - `should_commit` requires downward velocity strictly greater than zero
//! - A release with no recorded touch never commits
//!
//! Callers pass `Instant` values in; the arbiter never reads the clock, so
//! tests drive time explicitly.

use crate::geometry::Point;
use std::time::{Duration, Instant};

// ============================================================================
// Pan Gesture
// ============================================================================

/// Lifecycle phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    /// Finger down and movement passed the recognition threshold.
    Began,
    /// Finger moved.
    Changed,
    /// Finger lifted.
    Ended,
    /// Recognition aborted by the host (e.g. an incoming call).
    Cancelled,
}

/// A single pan gesture update from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    pub phase: PanPhase,
    /// Cumulative translation since `Began`, in container points.
    pub translation: Point,
    /// Instantaneous velocity in points per second.
    pub velocity: Point,
}

impl PanGesture {
    #[must_use]
    pub const fn new(phase: PanPhase, translation: Point, velocity: Point) -> Self {
        Self {
            phase,
            translation,
            velocity,
        }
    }
}

// ============================================================================
// Drag Arbiter
// ============================================================================

/// Tunable thresholds for [`DragArbiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragArbiterConfig {
    /// How recently the finger must have moved for a release to count as a
    /// flick rather than a stall.
    pub recency_window: Duration,
}

impl Default for DragArbiterConfig {
    fn default() -> Self {
        Self {
            recency_window: Duration::from_millis(250),
        }
    }
}

/// Decides whether a released drag commits its action.
#[derive(Debug, Clone)]
pub struct DragArbiter {
    config: DragArbiterConfig,
    last_touch: Option<Instant>,
}

impl DragArbiter {
    #[must_use]
    pub fn new(config: DragArbiterConfig) -> Self {
        Self {
            config,
            last_touch: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DragArbiterConfig {
        &self.config
    }

    /// Record finger contact or movement at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_touch = Some(now);
    }

    /// Forget the current drag. Call when a gesture ends or is cancelled.
    pub fn reset(&mut self) {
        self.last_touch = None;
    }

    /// Whether the drag moved within the recency window before `now`.
    #[must_use]
    pub fn is_recent(&self, now: Instant) -> bool {
        match self.last_touch {
            Some(last) => now.saturating_duration_since(last) < self.config.recency_window,
            None => false,
        }
    }

    /// Dismissal commit rule: the finger was moving downward and moved
    /// recently. Velocity exactly zero does not commit.
    #[must_use]
    pub fn should_commit(&self, velocity_y: f32, now: Instant) -> bool {
        velocity_y > 0.0 && self.is_recent(now)
    }

    /// Picker swipe-delete rule: dragged left past half the container, or
    /// released leftward with leftward velocity within the recency window.
    #[must_use]
    pub fn should_delete(
        &self,
        delta_x: f32,
        velocity_x: f32,
        container_width: f32,
        now: Instant,
    ) -> bool {
        if delta_x < -container_width / 2.0 {
            return true;
        }
        delta_x < 0.0 && velocity_x < 0.0 && self.is_recent(now)
    }
}

/// Begin policy for horizontal card pans: recognize only when the initial
/// velocity is predominantly horizontal, so vertical scrolls win ties.
#[inline]
#[must_use]
pub fn is_horizontal(velocity: Point) -> bool {
    velocity.x.abs() > velocity.y.abs()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
