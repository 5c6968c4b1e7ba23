//! Eased interpolation of rendered marker positions.
//!
//! An [`Animator`] owns one rendered position and at most one in-flight
//! [`Tween`]. The host calls [`Animator::tick`] once per animation frame with
//! the frame timestamp; the animator never schedules anything itself, so it
//! cannot block and cannot fail. Starting a new run replaces the previous one
//! and begins from wherever the marker currently is.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::transform::GridCoord;

/// Quadratic ease-in-out on `t` in `[0, 1]`.
#[must_use]
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// One interpolation run from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: GridCoord,
    pub to: GridCoord,
    /// Frame timestamp captured when the run started.
    pub started_ms: f64,
    pub duration_ms: f64,
}

impl Tween {
    /// Normalized progress at `now_ms`, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased position at `now_ms`.
    #[must_use]
    pub fn sample(&self, now_ms: f64) -> GridCoord {
        self.from.lerp(self.to, ease_in_out_quad(self.progress(now_ms)))
    }
}

/// A rendered position steered toward authoritative coordinates.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    position: GridCoord,
    active: Option<Tween>,
}

impl Animator {
    #[must_use]
    pub fn new(position: GridCoord) -> Self {
        Self { position, active: None }
    }

    /// The rendered position as of the last tick.
    #[must_use]
    pub fn position(&self) -> GridCoord {
        self.position
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// The in-flight run, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Tween> {
        self.active.as_ref()
    }

    /// Start a run toward `to`, cancelling any in-flight run.
    ///
    /// The run starts at the current rendered position, not at the cancelled
    /// run's origin.
    pub fn animate_to(&mut self, to: GridCoord, now_ms: f64, duration_ms: f64) {
        self.active = Some(Tween { from: self.position, to, started_ms: now_ms, duration_ms });
    }

    /// Jump to `position` with no interpolation.
    pub fn snap_to(&mut self, position: GridCoord) {
        self.active = None;
        self.position = position;
    }

    /// Drop the in-flight run, leaving the marker where it is.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Advance to `now_ms`. Returns the new position if a run was active.
    ///
    /// The run is dropped on the tick where progress reaches 1.
    pub fn tick(&mut self, now_ms: f64) -> Option<GridCoord> {
        let tween = self.active?;
        self.position = tween.sample(now_ms);
        if tween.progress(now_ms) >= 1.0 {
            self.active = None;
        }
        Some(self.position)
    }
}
