#![forbid(unsafe_code)]

//! Core: geometry, transforms, animation timing, gestures, and observers.
//!
//! # Role in draftstack
//! `draftstack-core` is the foundation layer. It owns the value types and
//! timing primitives every other crate computes with, and it has no state
//! of its own beyond the arbiter's touch timestamp.
//!
//! # Primary responsibilities
//! - **Geometry**: float rects, points, and edge insets that interpolate.
//! - **Transform3D**: the stacked-card tilt/scale/perspective math.
//! - **Animation**: easing curves, tick-driven timers, completion latches.
//! - **Gesture**: pan phases and the drag commit/delete arbiter.
//! - **Observer**: typed event fan-out with RAII unsubscription.
//! - **Metrics**: the tuned chrome constants shared by all layers.
//!
//! # How it fits in the system
//! The layout solver (`draftstack-layout`) consumes geometry and
//! transforms; the presentation and picker crates consume all of it. This
//! crate never depends upward.

pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod metrics;
pub mod observer;
pub mod transform;

pub use animation::{AnimationTimer, CompletionLatch, Easing};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use gesture::{DragArbiter, DragArbiterConfig, PanGesture, PanPhase, is_horizontal};
pub use observer::{ObserverList, Subscription};
pub use transform::Transform3D;
