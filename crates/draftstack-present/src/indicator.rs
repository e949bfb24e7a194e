#![forbid(unsafe_code)]

//! The minimized-drafts indicator model.
//!
//! A host control sits at the bottom of the screen and renders this
//! model: the most recent draft's title over a count-dependent stack of
//! card edges. The model subscribes to registry changes and re-derives
//! its state on each one; the presentation insets are computed from the
//! same `visible_indicator_height` function so the minimize animation
//! docks exactly onto the rendered indicator.

use crate::events::RegistryChange;
use crate::registry::OpenDraftsRegistry;
use draftstack_core::metrics::{INDICATOR_DISPLAY_HEIGHT, visible_indicator_height};
use draftstack_core::observer::Subscription;
use std::cell::RefCell;
use std::rc::Rc;

/// Render state for the indicator control.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorState {
    pub open_count: usize,
    pub most_recent_title: Option<String>,
}

impl IndicatorState {
    /// Height the control should occupy: zero when nothing is minimized.
    #[must_use]
    pub fn intrinsic_height(&self) -> f32 {
        if self.open_count > 0 {
            INDICATOR_DISPLAY_HEIGHT
        } else {
            0.0
        }
    }

    /// Offset of the title card from the top of the control; deeper stacks
    /// push it down to expose the card edges above it.
    #[must_use]
    pub fn title_top_offset(&self) -> f32 {
        if self.open_count == 0 {
            return 0.0;
        }
        6.0 + 4.0 * (self.open_count - 1).min(2) as f32
    }

    #[must_use]
    pub fn shows_second_card(&self) -> bool {
        self.open_count >= 2
    }

    #[must_use]
    pub fn shows_third_card(&self) -> bool {
        self.open_count >= 3
    }

    #[must_use]
    pub fn accessibility_label(&self) -> Option<String> {
        let title = self.most_recent_title.as_deref().unwrap_or("Unknown");
        match self.open_count {
            0 => None,
            1 => Some(format!("One minimized draft: {title}")),
            n => Some(format!("{n} minimized drafts. Most recent: {title}")),
        }
    }

    #[must_use]
    pub fn accessibility_hint(&self) -> Option<&'static str> {
        match self.open_count {
            0 => None,
            1 => Some("Double tap to open"),
            _ => Some("Double tap to select"),
        }
    }
}

/// Live indicator model bound to a registry.
#[derive(Debug)]
pub struct OpenDraftsIndicatorModel {
    state: Rc<RefCell<IndicatorState>>,
    _subscription: Subscription,
}

impl OpenDraftsIndicatorModel {
    /// Bind to a registry. The model reflects the current registry contents
    /// immediately and follows every change from then on.
    #[must_use]
    pub fn new(registry: &OpenDraftsRegistry) -> Self {
        let state = Rc::new(RefCell::new(IndicatorState {
            open_count: registry.count(),
            most_recent_title: registry.most_recent_title(),
        }));
        let state_clone = Rc::clone(&state);
        let subscription = registry.changes().subscribe(move |change: &RegistryChange| {
            *state_clone.borrow_mut() = IndicatorState {
                open_count: change.count(),
                most_recent_title: change.most_recent_title.clone(),
            };
        });
        Self {
            state,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn state(&self) -> IndicatorState {
        self.state.borrow().clone()
    }

    /// Height of the indicator sliver left visible under a presented draft.
    #[must_use]
    pub fn visible_header_height(&self) -> f32 {
        visible_indicator_height(self.state.borrow().open_count)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
