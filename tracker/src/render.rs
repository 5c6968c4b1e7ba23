//! Rendering: draws a tracking [`Scene`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives an already-projected scene and produces pixels; it does not
//! mutate any application state. Grid geometry is computed by plain functions
//! ([`grid_lines`], [`axis_labels`]) so it can be tested without a browser.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::tracking::GridMap::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::interaction::Hover;
use crate::tracking::Scene;
use crate::transform::{GridViewport, Point};

const GRID_STROKE: &str = "#e5e7eb";
const LABEL_FILL: &str = "#4b5563";
const PATH_STROKE: &str = "rgb(59, 130, 246)";
const START_FILL: &str = "rgb(34, 197, 94)";
const TARGET_FILL: &str = "rgb(239, 68, 68)";
const DEVICE_FILL: &str = "rgb(59, 130, 246)";
const DEVICE_TOOLTIP_FILL: &str = "rgba(17, 24, 39, 1)";
const HOVER_TOOLTIP_FILL: &str = "rgba(0, 0, 0, 0.8)";

/// Interior grid dash segment length in pixels.
const GRID_DASH_PX: f64 = 2.0;
const PATH_WIDTH_PX: f64 = 3.0;
const POINT_MARKER_RADIUS_PX: f64 = 7.0;
const DEVICE_RADIUS_PX: f64 = 8.0;
const DEVICE_CORE_RADIUS_PX: f64 = 4.0;
/// Baseline of the x-axis labels, measured up from the canvas bottom.
const X_LABEL_INSET_PX: f64 = 15.0;
/// Center of the y-axis labels, measured from the canvas left edge.
const Y_LABEL_X_PX: f64 = 25.0;
const TOOLTIP_OFFSET_PX: f64 = 10.0;
const TOOLTIP_PAD_X_PX: f64 = 8.0;
const TOOLTIP_HEIGHT_PX: f64 = 20.0;
const LABEL_FONT: &str = "12px sans-serif";

/// One grid line in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    /// Interior lines are dashed; the border is solid.
    pub dashed: bool,
}

/// One axis tick label in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    /// Center-aligned anchor.
    pub at: Point,
}

/// Vertical then horizontal grid lines, one per whole grid unit.
#[must_use]
pub fn grid_lines(vp: &GridViewport) -> Vec<GridLine> {
    let steps = unit_steps(vp.grid_size);
    let mut lines = Vec::with_capacity((steps + 1) * 2);
    for i in 0..=steps {
        let x = vp.padding + step_fraction(i, steps) * vp.usable_width();
        lines.push(GridLine {
            from: Point::new(x, vp.padding),
            to: Point::new(x, vp.height - vp.padding),
            dashed: i != 0 && i != steps,
        });
    }
    for j in 0..=steps {
        let y = vp.padding + step_fraction(j, steps) * vp.usable_height();
        lines.push(GridLine {
            from: Point::new(vp.padding, y),
            to: Point::new(vp.width - vp.padding, y),
            dashed: j != 0 && j != steps,
        });
    }
    lines
}

/// X labels run `0..=grid` left to right; y labels run `grid..=0` top to bottom.
#[must_use]
pub fn axis_labels(vp: &GridViewport) -> Vec<AxisLabel> {
    let steps = unit_steps(vp.grid_size);
    let mut labels = Vec::with_capacity((steps + 1) * 2);
    for i in 0..=steps {
        let x = vp.padding + step_fraction(i, steps) * vp.usable_width();
        labels.push(AxisLabel { text: i.to_string(), at: Point::new(x, vp.height - X_LABEL_INSET_PX) });
    }
    for i in 0..=steps {
        let y = vp.padding + step_fraction(i, steps) * vp.usable_height();
        labels.push(AxisLabel { text: (steps - i).to_string(), at: Point::new(Y_LABEL_X_PX, y + 4.0) });
    }
    labels
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_steps(grid_size: f64) -> usize {
    if grid_size.is_finite() && grid_size >= 1.0 { grid_size.floor() as usize } else { 1 }
}

#[allow(clippy::cast_precision_loss)]
fn step_fraction(i: usize, steps: usize) -> f64 {
    i as f64 / steps as f64
}

/// Draw the full scene: background, grid, trail, markers and tooltips.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene) -> Result<(), JsValue> {
    let vp = &scene.viewport;

    // Layer 1: background.
    ctx.set_fill_style_str("white");
    ctx.fill_rect(0.0, 0.0, vp.width, vp.height);

    // Layer 2: grid and axes.
    draw_grid(ctx, vp)?;
    draw_axis_labels(ctx, vp)?;

    // Layer 3: trail and markers.
    if scene.path.len() > 1 {
        draw_path(ctx, &scene.path);
    }
    if let Some(start) = scene.start {
        draw_point_marker(ctx, start, START_FILL, "Start")?;
    }
    if let Some(target) = scene.target {
        draw_point_marker(ctx, target, TARGET_FILL, "Target")?;
    }
    draw_device(ctx, scene.device)?;

    // Layer 4: tooltips.
    draw_tooltip(ctx, scene.device, &scene.device_label, DEVICE_TOOLTIP_FILL)?;
    if let Some(hover) = scene.hover {
        draw_hover(ctx, hover)?;
    }

    Ok(())
}

// =============================================================
// Grid
// =============================================================

fn draw_grid(ctx: &CanvasRenderingContext2d, vp: &GridViewport) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(GRID_STROKE);
    ctx.set_line_width(1.0);

    let dash_array = js_sys::Array::new();
    dash_array.push(&GRID_DASH_PX.into());
    dash_array.push(&GRID_DASH_PX.into());
    let solid = js_sys::Array::new();

    for line in grid_lines(vp) {
        ctx.set_line_dash(if line.dashed { &dash_array } else { &solid })?;
        ctx.begin_path();
        ctx.move_to(line.from.x, line.from.y);
        ctx.line_to(line.to.x, line.to.y);
        ctx.stroke();
    }

    ctx.set_line_dash(&solid)?;
    ctx.restore();
    Ok(())
}

fn draw_axis_labels(ctx: &CanvasRenderingContext2d, vp: &GridViewport) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(LABEL_FILL);
    ctx.set_font(LABEL_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("alphabetic");
    for label in axis_labels(vp) {
        ctx.fill_text(&label.text, label.at.x, label.at.y)?;
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Trail and markers
// =============================================================

fn draw_path(ctx: &CanvasRenderingContext2d, path: &[Point]) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    ctx.save();
    ctx.set_stroke_style_str(PATH_STROKE);
    ctx.set_line_width(PATH_WIDTH_PX);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_point_marker(ctx: &CanvasRenderingContext2d, at: Point, fill: &str, label: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.begin_path();
    ctx.arc(at.x, at.y, POINT_MARKER_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str(fill);
    ctx.fill();
    ctx.set_stroke_style_str("white");
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.set_font(LABEL_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("alphabetic");
    ctx.fill_text(label, at.x, at.y - 12.0)?;
    ctx.restore();
    Ok(())
}

fn draw_device(ctx: &CanvasRenderingContext2d, at: Point) -> Result<(), JsValue> {
    ctx.save();
    ctx.begin_path();
    ctx.arc(at.x, at.y, DEVICE_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str(DEVICE_FILL);
    ctx.fill();
    ctx.set_stroke_style_str("white");
    ctx.set_line_width(3.0);
    ctx.stroke();

    ctx.begin_path();
    ctx.arc(at.x, at.y, DEVICE_CORE_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("white");
    ctx.fill();
    ctx.restore();
    Ok(())
}

// =============================================================
// Tooltips
// =============================================================

fn draw_hover(ctx: &CanvasRenderingContext2d, hover: Hover) -> Result<(), JsValue> {
    draw_tooltip(ctx, hover.pixel, &hover.label(), HOVER_TOOLTIP_FILL)
}

/// A dark box centered above `anchor`, its bottom edge `TOOLTIP_OFFSET_PX` up.
fn draw_tooltip(ctx: &CanvasRenderingContext2d, anchor: Point, text: &str, fill: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_font(LABEL_FONT);
    let text_w = ctx.measure_text(text).map_or(0.0, |m| m.width());
    let box_w = text_w + TOOLTIP_PAD_X_PX * 2.0;
    let bottom = anchor.y - TOOLTIP_OFFSET_PX;
    let top = bottom - TOOLTIP_HEIGHT_PX;

    ctx.set_fill_style_str(fill);
    ctx.fill_rect(anchor.x - box_w / 2.0, top, box_w, TOOLTIP_HEIGHT_PX);

    ctx.set_fill_style_str("white");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(text, anchor.x, top + TOOLTIP_HEIGHT_PX / 2.0)?;
    ctx.restore();
    Ok(())
}
