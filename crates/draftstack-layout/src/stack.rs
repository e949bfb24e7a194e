#![forbid(unsafe_code)]

//! The stacked-card layout solver.
//!
//! One pure function of `(item count, container size, mode, pan state)`.
//! The host's animate-between-layouts machinery interpolates card frames
//! and transforms between two solutions, so the solver must be
//! deterministic and keep no state beyond its inputs.
//!
//! # Invariants
//!
//! - Exactly one `LayoutAttributes` per index 0..item_count, in order
//! - `z_index == index` in every mode
//! - Identical inputs produce identical output
//!
//! Item 0 is always the presenter background; drafts start at index 1.

use crate::attributes::{LayoutAttributes, LayoutMode, PannedItem};
use draftstack_core::geometry::{Point, Rect, Size};
use draftstack_core::metrics::{
    CARD_SCALE_INSET, PERSPECTIVE_DIVISOR, PRESENTED_TOP_INSET, PRESENTER_ALPHA, presented_insets,
    presenter_transform, stack_angle_degrees, visible_indicator_height,
};
use draftstack_core::transform::Transform3D;
use smallvec::SmallVec;

/// Attribute buffer sized for the common case of a handful of cards.
pub type AttributeVec = SmallVec<[LayoutAttributes; 8]>;

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSolution {
    /// One entry per item, ordered by index.
    pub attributes: AttributeVec,
    pub content_size: Size,
    /// The panned card's attributes, cached separately for use as the
    /// disappearing-item animation target.
    pub panned_target: Option<LayoutAttributes>,
}

impl LayoutSolution {
    fn empty() -> Self {
        Self {
            attributes: AttributeVec::new(),
            content_size: Size::ZERO,
            panned_target: None,
        }
    }
}

/// Stacked-card layout solver.
#[derive(Debug, Clone, Default)]
pub struct StackLayout {
    pub mode: LayoutMode,
    /// Active horizontal drag, if any. Only consulted in
    /// [`LayoutMode::AllDrafts`].
    pub panned: Option<PannedItem>,
    /// When set, the panned target continues fully off-screen left instead
    /// of holding at the drag position.
    pub deleting_panned_item: bool,
}

impl StackLayout {
    #[must_use]
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            panned: None,
            deleting_panned_item: false,
        }
    }

    /// Compute placement for `item_count` cards in `container`.
    #[must_use]
    pub fn solve(&self, item_count: usize, container: Size) -> LayoutSolution {
        if item_count == 0 || container.is_empty() {
            return LayoutSolution::empty();
        }
        match self.mode {
            LayoutMode::AllDrafts => self.solve_all_drafts(item_count, container),
            LayoutMode::DraftSelected { selected_index } => {
                solve_draft_selected(item_count, container, selected_index)
            }
            LayoutMode::PresenterSelected => solve_presenter_selected(item_count, container),
        }
    }

    fn solve_all_drafts(&self, count: usize, container: Size) -> LayoutSolution {
        let scale = 1.0 - CARD_SCALE_INSET / container.height;
        let clamped = count.clamp(2, 5);
        let vertical_gap = (container.height - 2.0 * PRESENTED_TOP_INSET) / clamped as f32;
        let angle = stack_angle_degrees(count);

        let mut attributes = AttributeVec::new();
        let mut panned_target = None;
        let mut center_y = PRESENTED_TOP_INSET;

        for i in 0..count {
            let size = if i == 0 {
                container
            } else {
                Rect::from_size(container).inset(presented_insets()).size
            };

            let mut center = Point::new(container.width / 2.0, center_y);
            let mut gap_scale = 1.0;
            if let Some(panned) = self.panned.filter(|p| p.index == i) {
                let tx = panned.translation.x;
                center.x += pan_shift(tx);
                if tx < 0.0 {
                    gap_scale = 1.0 - tx.abs() / container.width;
                }
            }

            let mut attrs = LayoutAttributes::new(i, Rect::from_size(size).with_center(center));
            attrs.transform = rotate_down(angle, size.height, scale);

            if self.panned.is_some_and(|p| p.index == i) {
                let mut target = attrs.clone();
                if self.deleting_panned_item {
                    target.frame = target.frame.offset(-container.width, 0.0);
                }
                panned_target = Some(target);
            }

            attributes.push(attrs);
            center_y += vertical_gap * gap_scale;
        }

        let content_size = attributes.last().map_or(Size::ZERO, |last| {
            Size::new(
                container.width,
                last.frame.max_y() - PRESENTED_TOP_INSET,
            )
        });

        LayoutSolution {
            attributes,
            content_size,
            panned_target,
        }
    }
}

/// Horizontal shift of a panned card: square-root resistance when dragged
/// right, direct tracking when dragged left.
fn pan_shift(tx: f32) -> f32 {
    if tx > 0.0 { tx.sqrt() } else { tx }
}

/// The tilted-stack card transform: translate down by half the item height
/// so the rotation hinges on the top edge, tip back, shrink, and project.
fn rotate_down(angle_degrees: f32, item_height: f32, scale: f32) -> Transform3D {
    Transform3D::translation(0.0, item_height / 2.0, 0.0)
        .concat(&Transform3D::rotation_x(-angle_degrees.to_radians()))
        .concat(&Transform3D::scale(scale, scale, scale))
        .concat(&Transform3D::perspective(PERSPECTIVE_DIVISOR))
}

fn solve_draft_selected(count: usize, container: Size, selected_index: usize) -> LayoutSolution {
    debug_assert!(
        selected_index >= 1 && selected_index < count,
        "selected index {selected_index} out of range for {count} items"
    );
    let full = Rect::from_size(container);

    let mut attributes = AttributeVec::new();

    let mut presenter = LayoutAttributes::new(0, full);
    presenter.transform = presenter_transform(container.height);
    presenter.alpha = PRESENTER_ALPHA;
    attributes.push(presenter);

    if count == 1 {
        return LayoutSolution {
            attributes,
            content_size: container,
            panned_target: None,
        };
    }
    let selected_index = selected_index.clamp(1, count - 1);

    for i in 1..=selected_index {
        attributes.push(LayoutAttributes::new(i, full.inset(presented_insets())));
    }

    // Later drafts staged off-screen below, invisible until revealed.
    for i in (selected_index + 1)..count {
        let mut attrs =
            LayoutAttributes::new(i, Rect::from_size(container).offset(0.0, container.height));
        attrs.alpha = 0.0;
        attributes.push(attrs);
    }

    LayoutSolution {
        attributes,
        content_size: container,
        panned_target: None,
    }
}

fn solve_presenter_selected(count: usize, container: Size) -> LayoutSolution {
    let mut attributes = AttributeVec::new();
    attributes.push(LayoutAttributes::new(0, Rect::from_size(container)));

    let sliver_y = container.height - visible_indicator_height(count.saturating_sub(1));
    for i in 1..count {
        attributes.push(LayoutAttributes::new(
            i,
            Rect::from_size(container).offset(0.0, sliver_y),
        ));
    }

    LayoutSolution {
        attributes,
        content_size: container,
        panned_target: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use draftstack_core::geometry::Point;

    const CONTAINER: Size = Size::new(320.0, 568.0);
    const EPS: f32 = 1e-4;

    fn all_drafts() -> StackLayout {
        StackLayout::new(LayoutMode::AllDrafts)
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    #[test]
    fn empty_count_yields_empty_solution() {
        for mode in [
            LayoutMode::AllDrafts,
            LayoutMode::PresenterSelected,
        ] {
            let solution = StackLayout::new(mode).solve(0, CONTAINER);
            assert!(solution.attributes.is_empty());
            assert_eq!(solution.content_size, Size::ZERO);
            assert!(solution.panned_target.is_none());
        }
    }

    #[test]
    fn one_attribute_per_index_in_order() {
        for count in 1..=9 {
            let solution = all_drafts().solve(count, CONTAINER);
            assert_eq!(solution.attributes.len(), count);
            for (i, attrs) in solution.attributes.iter().enumerate() {
                assert_eq!(attrs.index, i);
                assert_eq!(attrs.z_index, i);
            }
        }
    }

    #[test]
    fn all_drafts_centers_step_by_gap() {
        let solution = all_drafts().solve(4, CONTAINER);
        // Four items: clamped 4, gap = (568 - 80) / 4 = 122.
        let gap = (568.0 - 80.0) / 4.0;
        for (i, attrs) in solution.attributes.iter().enumerate() {
            let center = attrs.frame.center();
            assert_close(center.x, 160.0);
            assert_close(center.y, 40.0 + i as f32 * gap);
        }
    }

    #[test]
    fn all_drafts_item_zero_full_size_rest_inset() {
        let solution = all_drafts().solve(3, CONTAINER);
        assert_eq!(solution.attributes[0].frame.size, CONTAINER);
        for attrs in &solution.attributes[1..] {
            assert_eq!(attrs.frame.size, Size::new(320.0, 528.0));
        }
    }

    #[test]
    fn all_drafts_angle_steps_with_count() {
        for (count, degrees) in [(1, 30.0_f32), (2, 30.0), (3, 45.0), (4, 61.0), (7, 61.0)] {
            let solution = all_drafts().solve(count, CONTAINER);
            let angle = solution.attributes[count - 1].transform.decomposed_x_rotation();
            assert!(
                (angle - (-degrees.to_radians())).abs() < 1e-3,
                "count {count}: got {angle}, want {}",
                -degrees.to_radians()
            );
        }
    }

    #[test]
    fn all_drafts_transform_matches_composition() {
        let solution = all_drafts().solve(2, CONTAINER);
        let card = &solution.attributes[1];
        let scale = 1.0 - 12.0 / 568.0;
        let expected = Transform3D::translation(0.0, 528.0 / 2.0, 0.0)
            .concat(&Transform3D::rotation_x(-30.0_f32.to_radians()))
            .concat(&Transform3D::scale(scale, scale, scale))
            .concat(&Transform3D::perspective(1500.0));
        assert_eq!(card.transform, expected);
    }

    #[test]
    fn all_drafts_content_size_tracks_last_card() {
        let solution = all_drafts().solve(5, CONTAINER);
        let last = solution.attributes.last().unwrap();
        assert_close(solution.content_size.width, 320.0);
        assert_close(solution.content_size.height, last.frame.max_y() - 40.0);
    }

    #[test]
    fn single_item_degenerates_to_pair_spacing() {
        // One item clamps to two for gap and angle only.
        let solution = all_drafts().solve(1, CONTAINER);
        assert_eq!(solution.attributes.len(), 1);
        let angle = solution.attributes[0].transform.decomposed_x_rotation();
        assert!((angle - (-30.0_f32.to_radians())).abs() < 1e-3);
    }

    #[test]
    fn pan_left_tracks_directly_and_closes_gap() {
        let mut layout = all_drafts();
        layout.panned = Some(PannedItem {
            index: 1,
            translation: Point::new(-80.0, 0.0),
        });
        let solution = layout.solve(3, CONTAINER);
        let base = all_drafts().solve(3, CONTAINER);

        let gap = (568.0 - 80.0) / 3.0;
        assert_close(solution.attributes[1].frame.center().x, 160.0 - 80.0);
        // The gap after the panned card shrinks by 1 - 80/320.
        let scaled_gap = gap * (1.0 - 80.0 / 320.0);
        assert_close(
            solution.attributes[2].frame.center().y,
            solution.attributes[1].frame.center().y + scaled_gap,
        );
        // Cards before the panned one are untouched.
        assert_eq!(solution.attributes[0], base.attributes[0]);
    }

    #[test]
    fn pan_right_meets_square_root_resistance() {
        let mut layout = all_drafts();
        layout.panned = Some(PannedItem {
            index: 2,
            translation: Point::new(100.0, 0.0),
        });
        let solution = layout.solve(3, CONTAINER);
        assert_close(solution.attributes[2].frame.center().x, 160.0 + 10.0);
        // Rightward drags leave the following gap alone.
        let base = all_drafts().solve(3, CONTAINER);
        assert_eq!(
            solution.attributes[1].frame.center().y,
            base.attributes[1].frame.center().y
        );
    }

    #[test]
    fn panned_target_cached_separately() {
        let mut layout = all_drafts();
        layout.panned = Some(PannedItem {
            index: 1,
            translation: Point::new(-40.0, 0.0),
        });
        let solution = layout.solve(2, CONTAINER);
        let target = solution.panned_target.expect("panned target");
        assert_eq!(target, solution.attributes[1]);
    }

    #[test]
    fn deleting_target_slides_fully_off_screen() {
        let mut layout = all_drafts();
        layout.panned = Some(PannedItem {
            index: 1,
            translation: Point::new(-40.0, 0.0),
        });
        layout.deleting_panned_item = true;
        let solution = layout.solve(2, CONTAINER);
        let target = solution.panned_target.expect("panned target");
        assert!(target.frame.max_x() < 0.0);
        // The live attribute stays at the drag position.
        assert!(solution.attributes[1].frame.max_x() > 0.0);
    }

    #[test]
    fn draft_selected_shapes() {
        let layout = StackLayout::new(LayoutMode::DraftSelected { selected_index: 2 });
        let solution = layout.solve(4, CONTAINER);

        let presenter = &solution.attributes[0];
        assert_eq!(presenter.frame, Rect::from_size(CONTAINER));
        assert_eq!(
            presenter.transform,
            presenter_transform(CONTAINER.height)
        );
        assert_eq!(presenter.alpha, PRESENTER_ALPHA);

        // Items 1..=selected are full-size inset cards.
        for attrs in &solution.attributes[1..=2] {
            assert_eq!(attrs.frame, Rect::new(0.0, 40.0, 320.0, 528.0));
            assert!(attrs.transform.is_identity());
            assert_eq!(attrs.alpha, 1.0);
        }

        // Items past the selection wait off-screen below, invisible.
        let staged = &solution.attributes[3];
        assert_eq!(staged.frame.min_y(), 568.0);
        assert_eq!(staged.alpha, 0.0);
        assert_eq!(solution.content_size, CONTAINER);
    }

    #[test]
    fn presenter_selected_collapses_to_sliver() {
        let layout = StackLayout::new(LayoutMode::PresenterSelected);
        let solution = layout.solve(4, CONTAINER);

        assert_eq!(solution.attributes[0].frame, Rect::from_size(CONTAINER));
        // Three drafts: sliver height is visible_indicator_height(3) = 30.
        for attrs in &solution.attributes[1..] {
            assert_close(attrs.frame.min_y(), 568.0 - 30.0);
            assert_eq!(attrs.frame.size, CONTAINER);
        }
    }

    #[test]
    fn serde_round_trip_solution_attributes() {
        let solution = all_drafts().solve(3, CONTAINER);
        let json = serde_json::to_string(&solution.attributes.to_vec()).unwrap();
        let back: Vec<LayoutAttributes> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice(), solution.attributes.as_slice());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use draftstack_core::geometry::Point;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn solver_is_deterministic(
            count in 0usize..12,
            width in 200.0f32..800.0,
            height in 300.0f32..1200.0,
            tx in -300.0f32..300.0,
        ) {
            let mut layout = StackLayout::new(LayoutMode::AllDrafts);
            if count > 1 {
                layout.panned = Some(PannedItem {
                    index: 1,
                    translation: Point::new(tx, 0.0),
                });
            }
            let container = Size::new(width, height);
            let a = layout.solve(count, container);
            let b = layout.solve(count, container);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn attribute_count_and_order_hold_in_every_mode(
            count in 1usize..10,
            selected in 1usize..9,
        ) {
            let modes = [
                LayoutMode::AllDrafts,
                LayoutMode::DraftSelected { selected_index: selected.min(count.max(2) - 1).max(1) },
                LayoutMode::PresenterSelected,
            ];
            for mode in modes {
                if let LayoutMode::DraftSelected { selected_index } = mode {
                    if count < 2 || selected_index >= count {
                        continue;
                    }
                }
                let solution = StackLayout::new(mode).solve(count, Size::new(320.0, 568.0));
                prop_assert_eq!(solution.attributes.len(), count);
                for (i, attrs) in solution.attributes.iter().enumerate() {
                    prop_assert_eq!(attrs.index, i);
                    prop_assert_eq!(attrs.z_index, i);
                }
            }
        }

        #[test]
        fn stack_centers_monotonically_descend(count in 1usize..10) {
            let solution = StackLayout::new(LayoutMode::AllDrafts)
                .solve(count, Size::new(320.0, 568.0));
            let mut prev = f32::NEG_INFINITY;
            for attrs in &solution.attributes {
                let y = attrs.frame.center().y;
                prop_assert!(y > prev);
                prev = y;
            }
        }
    }
}
