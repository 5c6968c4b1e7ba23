//! Tracking view: the per-frame glue between channel state and the map.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`TrackingView`] is the single writer of [`DeviceRenderState`]. The host
//! feeds it three things: channel snapshots through [`TrackingView::observe`],
//! frame timestamps through [`TrackingView::on_frame`], and pointer events.
//! It answers with [`Action`]s for the host to carry out, and with a
//! pixel-space [`Scene`] for whoever draws the map.
//!
//! [`GridMap`] binds a view to an `HtmlCanvasElement` for the browser build;
//! everything else here is plain data and is tested natively.

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tracking_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::animation::Animator;
use crate::channel::ChannelState;
use crate::consts::{PATH_TWEEN_MS, TARGET_TWEEN_MS};
use crate::device::DeviceRenderState;
use crate::interaction::{Hover, PointerState};
use crate::render;
use crate::transform::{GridCoord, GridViewport, Point};

/// Actions returned from view handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    /// The operator picked a navigation target.
    SubmitTarget(GridCoord),
    /// Something visible changed; redraw.
    RenderNeeded,
}

/// Everything the renderer needs, already in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: GridViewport,
    /// Trail points in arrival order.
    pub path: Vec<Point>,
    pub start: Option<Point>,
    /// Animated target marker position.
    pub target: Option<Point>,
    /// Animated device marker position.
    pub device: Point,
    pub device_label: String,
    pub hover: Option<Hover>,
}

/// Animated map state for one tracked device.
#[derive(Debug, Clone)]
pub struct TrackingView {
    viewport: GridViewport,
    device: DeviceRenderState,
    device_anim: Animator,
    target_anim: Animator,
    pointer: PointerState,
    seen_trail_len: usize,
    seen_tail: Option<GridCoord>,
    seen_target: Option<GridCoord>,
}

impl Default for TrackingView {
    fn default() -> Self {
        Self::new(GridViewport::default())
    }
}

impl TrackingView {
    #[must_use]
    pub fn new(viewport: GridViewport) -> Self {
        let device = DeviceRenderState::default();
        let device_anim = Animator::new(device.rendered_position);
        Self {
            viewport,
            device,
            device_anim,
            target_anim: Animator::default(),
            pointer: PointerState::default(),
            seen_trail_len: 0,
            seen_tail: None,
            seen_target: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> &GridViewport {
        &self.viewport
    }

    #[must_use]
    pub fn device(&self) -> &DeviceRenderState {
        &self.device
    }

    /// Rendered target marker position, once a target has been seen.
    #[must_use]
    pub fn target_position(&self) -> Option<GridCoord> {
        self.seen_target.map(|_| self.target_anim.position())
    }

    #[must_use]
    pub fn hover(&self) -> Option<Hover> {
        self.pointer.hover()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.device_anim.is_animating() || self.target_anim.is_animating()
    }

    // --- Data inputs ---

    /// Compare `channel` with what was last seen and start interpolation runs
    /// for whatever moved.
    pub fn observe(&mut self, channel: &ChannelState, now_ms: f64) -> Action {
        let mut changed = false;

        let online = channel.is_connected();
        if self.device.is_online != online {
            self.device.is_online = online;
            changed = true;
        }

        let trail = channel.path_trail();
        let tail = trail.last();
        if trail.len() != self.seen_trail_len || tail != self.seen_tail {
            self.seen_trail_len = trail.len();
            self.seen_tail = tail;
            if let Some(tail) = tail {
                self.device_anim.animate_to(tail, now_ms, PATH_TWEEN_MS);
                changed = true;
            }
        }

        let target = channel.target_point();
        if target != self.seen_target {
            match (self.seen_target, target) {
                (None, Some(coord)) => self.target_anim.snap_to(coord),
                (Some(_), Some(coord)) => self.target_anim.animate_to(coord, now_ms, TARGET_TWEEN_MS),
                (_, None) => self.target_anim.cancel(),
            }
            self.seen_target = target;
            changed = true;
        }

        if changed { Action::RenderNeeded } else { Action::None }
    }

    /// Advance both markers to the frame timestamp `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) -> Action {
        let target_moved = self.target_anim.tick(now_ms).is_some();
        let device_moved = match self.device_anim.tick(now_ms) {
            Some(position) => {
                self.device.rendered_position = position;
                self.device.last_update_ms = Some(now_ms);
                true
            }
            None => false,
        };
        if device_moved || target_moved { Action::RenderNeeded } else { Action::None }
    }

    /// Stop both markers where they are. Used on teardown.
    pub fn cancel_animations(&mut self) {
        self.device_anim.cancel();
        self.target_anim.cancel();
    }

    // --- Input events ---

    pub fn on_pointer_move(&mut self, pixel: Point) -> Action {
        self.pointer.on_pointer_move(pixel, &self.viewport);
        Action::RenderNeeded
    }

    pub fn on_pointer_leave(&mut self) -> Action {
        if self.pointer.hover().is_none() {
            return Action::None;
        }
        self.pointer.on_pointer_leave();
        Action::RenderNeeded
    }

    pub fn on_click(&self) -> Action {
        match self.pointer.on_click() {
            Some(coord) => Action::SubmitTarget(coord),
            None => Action::None,
        }
    }

    // --- Render ---

    /// Project the current state into canvas pixels.
    #[must_use]
    pub fn scene(&self, channel: &ChannelState) -> Scene {
        let vp = &self.viewport;
        Scene {
            viewport: *vp,
            path: channel.path_trail().iter().map(|p| vp.grid_to_pixel(*p)).collect(),
            start: channel.start_point().map(|s| vp.grid_to_pixel(s.position())),
            target: self.target_position().map(|t| vp.grid_to_pixel(t)),
            device: vp.grid_to_pixel(self.device.rendered_position),
            device_label: self.device.position_label(),
            hover: self.pointer.hover(),
        }
    }
}

/// A [`TrackingView`] bound to a browser canvas.
pub struct GridMap {
    canvas: HtmlCanvasElement,
    pub view: TrackingView,
}

impl GridMap {
    /// Bind to `canvas`, sizing the grid to its current pixel dimensions.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let viewport = GridViewport::with_size(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, view: TrackingView::new(viewport) }
    }

    /// Draw the view's current scene.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self, channel: &ChannelState) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, &self.view.scene(channel))
    }
}
