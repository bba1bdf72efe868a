//! Property-based tests for the coordinate model.
//!
//! Percent → pixel → percent must round-trip for any measured container, and
//! pixel → percent must land in `[0, 100]` whatever the drag position.

use notes_app::services::coordinates::{clamp_percent, position_to_percent, position_to_pixels, to_percent, to_pixels};
use notes_app::types::geometry::{ContainerSize, PercentPosition};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-9;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn percent_round_trips_through_pixels(
        percent in 0.0f64..=100.0,
        size in 1e-3f64..1e5,
    ) {
        let back = to_percent(to_pixels(percent, size), size);
        prop_assert!((back - percent).abs() <= TOLERANCE * 100.0, "{} -> {}", percent, back);
    }

    #[test]
    fn to_percent_is_always_clamped(
        pixels in -1e6f64..1e6,
        size in 1e-3f64..1e5,
    ) {
        let percent = to_percent(pixels, size);
        prop_assert!((0.0..=100.0).contains(&percent));
    }

    #[test]
    fn unmeasured_container_resolves_to_zero(
        pixels in -1e4f64..1e4,
        size in -10.0f64..=0.0,
    ) {
        prop_assert_eq!(to_percent(pixels, size), 0.0);
    }

    #[test]
    fn clamp_is_identity_inside_range(percent in 0.0f64..=100.0) {
        prop_assert_eq!(clamp_percent(percent), percent);
    }

    #[test]
    fn position_round_trips_on_both_axes(
        x in 0.0f64..=100.0,
        y in 0.0f64..=100.0,
        width in 1.0f64..4000.0,
        height in 1.0f64..4000.0,
    ) {
        let container = ContainerSize::new(width, height);
        let pixels = position_to_pixels(PercentPosition { x, y }, container);
        let back = position_to_percent(pixels, container);
        prop_assert!((back.x - x).abs() <= 1e-7);
        prop_assert!((back.y - y).abs() <= 1e-7);
    }
}

#[test]
fn drag_past_container_edge_clamps_to_full_width() {
    assert_eq!(to_percent(1200.0, 800.0), 100.0);
    assert_eq!(to_percent(-20.0, 800.0), 0.0);
}
