//! Grid ⇄ pixel coordinate conversions for the map canvas.
//!
//! The tracking area is a square logical grid `[0, grid_size]²` drawn inside a
//! padded canvas. Grid y grows upward while canvas y grows downward, so the
//! grid origin renders at the bottom-left corner of the padded area.
//!
//! Every function here is pure and O(1); callers recompute on every frame and
//! every pointer move.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_PADDING_PX, DEFAULT_CANVAS_HEIGHT_PX, DEFAULT_CANVAS_WIDTH_PX, GRID_RESOLUTION, GRID_SIZE};

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A logical position in the tracking grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: f64,
    pub y: f64,
}

impl GridCoord {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into `[0, grid_size]`. `NaN` clamps to zero.
    #[must_use]
    pub fn clamped(self, grid_size: f64) -> Self {
        Self { x: clamp_axis(self.x, grid_size), y: clamp_axis(self.y, grid_size) }
    }

    /// Round both axes to the operator-facing grid resolution (one decimal).
    #[must_use]
    pub fn rounded(self) -> Self {
        Self { x: round_to_resolution(self.x), y: round_to_resolution(self.y) }
    }

    /// Linear interpolation toward `to`; `alpha` 0 yields `self`, 1 yields `to`.
    #[must_use]
    pub fn lerp(self, to: Self, alpha: f64) -> Self {
        Self { x: self.x + (to.x - self.x) * alpha, y: self.y + (to.y - self.y) * alpha }
    }

    /// Euclidean distance in grid units.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Canvas geometry used by both conversion directions.
///
/// Precondition: `width` and `height` exceed `2 * padding`. This is not
/// checked; a degenerate canvas yields non-finite or inverted results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridViewport {
    /// Canvas width in CSS pixels.
    pub width: f64,
    /// Canvas height in CSS pixels.
    pub height: f64,
    /// Logical grid extent on both axes.
    pub grid_size: f64,
    /// Inset between the canvas border and the grid area, in pixels.
    pub padding: f64,
}

impl Default for GridViewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH_PX,
            height: DEFAULT_CANVAS_HEIGHT_PX,
            grid_size: GRID_SIZE,
            padding: CANVAS_PADDING_PX,
        }
    }
}

impl GridViewport {
    /// A viewport of the given canvas size with the default grid and padding.
    #[must_use]
    pub fn with_size(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    #[must_use]
    pub fn usable_width(&self) -> f64 {
        self.width - self.padding * 2.0
    }

    #[must_use]
    pub fn usable_height(&self) -> f64 {
        self.height - self.padding * 2.0
    }

    /// Convert a grid coordinate to canvas pixels.
    #[must_use]
    pub fn grid_to_pixel(&self, grid: GridCoord) -> Point {
        Point {
            x: self.padding + (grid.x / self.grid_size) * self.usable_width(),
            y: self.padding + ((self.grid_size - grid.y) / self.grid_size) * self.usable_height(),
        }
    }

    /// Convert canvas pixels to a grid coordinate, clamped to the grid and
    /// rounded to one decimal.
    #[must_use]
    pub fn pixel_to_grid(&self, pixel: Point) -> GridCoord {
        let x = ((pixel.x - self.padding) / self.usable_width()) * self.grid_size;
        let y = self.grid_size - ((pixel.y - self.padding) / self.usable_height()) * self.grid_size;
        GridCoord { x, y }.clamped(self.grid_size).rounded()
    }
}

/// Free-function form of [`GridViewport::grid_to_pixel`].
#[must_use]
pub fn to_pixel(grid: GridCoord, canvas_width: f64, canvas_height: f64, grid_size: f64, padding: f64) -> Point {
    GridViewport { width: canvas_width, height: canvas_height, grid_size, padding }.grid_to_pixel(grid)
}

/// Free-function form of [`GridViewport::pixel_to_grid`].
#[must_use]
pub fn to_grid(pixel: Point, canvas_width: f64, canvas_height: f64, grid_size: f64, padding: f64) -> GridCoord {
    GridViewport { width: canvas_width, height: canvas_height, grid_size, padding }.pixel_to_grid(pixel)
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else if value >= max {
        max
    } else {
        value
    }
}

fn round_to_resolution(value: f64) -> f64 {
    (value * GRID_RESOLUTION).round() / GRID_RESOLUTION
}
