//! Shared numeric constants for the tracker crate.

// ── Grid ────────────────────────────────────────────────────────

/// Logical size of the tracking area on both axes, in grid units.
pub const GRID_SIZE: f64 = 3.0;

/// Inverse of the grid resolution: pointer coordinates snap to 1 / 10 units.
pub const GRID_RESOLUTION: f64 = 10.0;

// ── Canvas ──────────────────────────────────────────────────────

/// Padding between the canvas edge and the grid area, in pixels.
pub const CANVAS_PADDING_PX: f64 = 40.0;

/// Default map canvas width in CSS pixels.
pub const DEFAULT_CANVAS_WIDTH_PX: f64 = 600.0;

/// Default map canvas height in CSS pixels.
pub const DEFAULT_CANVAS_HEIGHT_PX: f64 = 500.0;

// ── Animation ───────────────────────────────────────────────────

/// Duration of the device-marker glide toward a new path point.
pub const PATH_TWEEN_MS: f64 = 700.0;

/// Duration of the target-marker glide toward a new target.
pub const TARGET_TWEEN_MS: f64 = 500.0;

// ── Drive ───────────────────────────────────────────────────────

/// Window in which a repeated key-up for the same key is treated as a bounce.
pub const DRIVE_RELEASE_DEBOUNCE_MS: f64 = 100.0;
