//! Pointer model for picking a navigation target on the map.
//!
//! Pointer moves map through the inverse transform into a transient hover
//! preview; a click commits whatever the preview currently shows. There is no
//! throttling: each move is a handful of float operations.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use crate::transform::{GridCoord, GridViewport, Point};

/// The grid coordinate under the pointer and where the pointer is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    /// Clamped, one-decimal grid coordinate under the pointer.
    pub coord: GridCoord,
    /// Pointer position in canvas pixels, used to anchor the tooltip.
    pub pixel: Point,
}

impl Hover {
    /// Tooltip text, e.g. `(1.2, 0.5)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("({:.1}, {:.1})", self.coord.x, self.coord.y)
    }
}

/// Transient pointer state over the map canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    hover: Option<Hover>,
}

impl PointerState {
    #[must_use]
    pub fn hover(&self) -> Option<Hover> {
        self.hover
    }

    /// Track the pointer at `pixel` and return the new preview.
    pub fn on_pointer_move(&mut self, pixel: Point, viewport: &GridViewport) -> Hover {
        let hover = Hover { coord: viewport.pixel_to_grid(pixel), pixel };
        self.hover = Some(hover);
        hover
    }

    /// The pointer left the canvas; drop the preview.
    pub fn on_pointer_leave(&mut self) {
        self.hover = None;
    }

    /// The coordinate a click at the current pointer position selects.
    #[must_use]
    pub fn on_click(&self) -> Option<GridCoord> {
        self.hover.map(|h| h.coord)
    }
}
