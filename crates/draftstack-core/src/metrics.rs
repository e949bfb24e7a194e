#![forbid(unsafe_code)]

//! Shared chrome metrics.
//!
//! The constants here are tuned values carried across every layer: the
//! layout solver, the presentation controller's insets, and the minimized
//! drafts indicator all have to agree on them, so they live in one place.

use crate::geometry::EdgeInsets;
use crate::transform::Transform3D;
use std::time::Duration;

/// Top inset applied to presented draft frames, in points.
pub const PRESENTED_TOP_INSET: f32 = 40.0;

/// Height of the header overlay shown across the top of a presented draft.
pub const HEADER_OVERLAY_HEIGHT: f32 = 44.0;

/// Full display height of the minimized drafts indicator.
pub const INDICATOR_DISPLAY_HEIGHT: f32 = 44.0;

/// Height of the accessibility dismiss strip above a presented draft.
pub const ACCESSIBILITY_DISMISS_HEIGHT: f32 = 20.0;

/// Alpha applied to the presenter card behind a selected draft.
pub const PRESENTER_ALPHA: f32 = 1.0;

/// Eye distance for the stacked-card perspective projection.
pub const PERSPECTIVE_DIVISOR: f32 = 1500.0;

/// Vertical points shaved off each edge by the stacked-card shrink; card
/// scale is `1 - CARD_SCALE_INSET / container_height`.
pub const CARD_SCALE_INSET: f32 = 12.0;

/// Points subtracted from the presenter extent by the background shrink.
pub const PRESENTER_SCALE_INSET: f32 = 30.0;

/// Duration of the standard presentation and dismissal animations.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Near-instant duration used by the legacy interactive-completion
/// workaround.
pub const LEGACY_HACK_DURATION: Duration = Duration::from_millis(50);

/// Fade-in applied when a stale snapshot is replaced after a size change.
pub const SNAPSHOT_FADE_DURATION: Duration = Duration::from_millis(250);

/// Duration of the picker's secondary chrome fade.
pub const PICKER_SECONDARY_FADE_DURATION: Duration = Duration::from_millis(200);

/// Delay before the picker's secondary chrome fade starts when it runs
/// alongside the layout switch.
pub const PICKER_SECONDARY_FADE_DELAY: Duration = Duration::from_millis(100);

/// Insets applied to presented draft frames (top only).
#[inline]
#[must_use]
pub const fn presented_insets() -> EdgeInsets {
    EdgeInsets::top_only(PRESENTED_TOP_INSET)
}

/// Visible height of the minimized drafts indicator for a given number of
/// open drafts.
///
/// Zero when nothing is minimized; otherwise the full height minus the
/// parts hidden under the stacked card edges (one edge per extra draft, up
/// to two).
#[must_use]
pub fn visible_indicator_height(open_count: usize) -> f32 {
    if open_count == 0 {
        return 0.0;
    }
    let stacked_edges = (open_count - 1).min(2) as f32;
    INDICATOR_DISPLAY_HEIGHT - (6.0 + 4.0 * stacked_edges)
}

/// Shrink transform applied to the presenting screen while a draft is up:
/// a uniform scale that pulls `PRESENTER_SCALE_INSET` points off the
/// container extent.
#[must_use]
pub fn presenter_transform(container_height: f32) -> Transform3D {
    let scale = (container_height - PRESENTER_SCALE_INSET) / container_height;
    Transform3D::uniform_scale(scale)
}

/// Stack tilt angle in degrees for a draft count. The count is clamped to
/// [2, 5] before the step function, so a lone card tilts like a pair.
#[must_use]
pub fn stack_angle_degrees(open_count: usize) -> f32 {
    match open_count.clamp(2, 5) {
        2 => 30.0,
        3 => 45.0,
        _ => 61.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
