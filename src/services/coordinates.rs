//! Coordinate conversion between stored note percentages and on-screen pixels.
//!
//! Percentages are the durable representation; pixels only exist for a single
//! render or drag event against the container's size at that moment.

use rand::Rng;

use crate::types::config::SpawnBounds;
use crate::types::geometry::{ContainerSize, PercentPosition, PixelPosition};

/// Size used in place of a container dimension that has not been measured yet.
pub const UNMEASURED_SIZE: f64 = 1.0;

fn is_measured(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// Replaces a zero, negative or non-finite dimension with [`UNMEASURED_SIZE`].
fn measured(size: f64) -> f64 {
    if is_measured(size) {
        size
    } else {
        UNMEASURED_SIZE
    }
}

/// Clamps a percentage into `[0, 100]`. Non-finite input maps to 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Converts a percentage of `container_size` to pixels.
pub fn to_pixels(percent: f64, container_size: f64) -> f64 {
    percent / 100.0 * measured(container_size)
}

/// Converts a pixel offset to a percentage of `container_size`, clamped to `[0, 100]`.
///
/// An unmeasured container resolves every offset to 0.
pub fn to_percent(pixels: f64, container_size: f64) -> f64 {
    if !is_measured(container_size) {
        return 0.0;
    }
    clamp_percent(pixels / container_size * 100.0)
}

pub fn position_to_pixels(position: PercentPosition, container: ContainerSize) -> PixelPosition {
    PixelPosition {
        x: to_pixels(position.x, container.width),
        y: to_pixels(position.y, container.height),
    }
}

pub fn position_to_percent(position: PixelPosition, container: ContainerSize) -> PercentPosition {
    PercentPosition {
        x: to_percent(position.x, container.width),
        y: to_percent(position.y, container.height),
    }
}

/// Picks a random position inside `bounds` for a newly created note.
pub fn random_spawn_position<R: Rng + ?Sized>(rng: &mut R, bounds: &SpawnBounds) -> PercentPosition {
    PercentPosition {
        x: sample_axis(rng, bounds.x_min, bounds.x_max),
        y: sample_axis(rng, bounds.y_min, bounds.y_max),
    }
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        clamp_percent(rng.gen_range(min..max))
    } else {
        clamp_percent(min)
    }
}
