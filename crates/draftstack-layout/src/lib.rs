#![forbid(unsafe_code)]

//! Layout: the stacked-card solver.
//!
//! # Role in draftstack
//! `draftstack-layout` turns `(item count, container size, mode, pan
//! state)` into per-card placement. The picker drives it directly; the
//! presentation crate shares its inset and indicator math through
//! `draftstack-core::metrics`.
//!
//! The solver is pure. Hosts animate between two solutions by
//! interpolating frames and transforms; nothing here ticks a clock.

pub mod attributes;
pub mod stack;

pub use attributes::{LayoutAttributes, LayoutMode, PannedItem};
pub use stack::{AttributeVec, LayoutSolution, StackLayout};
