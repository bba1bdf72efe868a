use serde::{Deserialize, Serialize};

/// Measured pixel size of the overlay container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pixel offset of a note from the container's top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Percentage position of a note inside its container, each axis in `[0, 100]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PercentPosition {
    pub x: f64,
    pub y: f64,
}
