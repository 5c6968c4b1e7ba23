//! Rendered device state and operator-facing readouts.

#[cfg(test)]
#[path = "device_test.rs"]
mod device_test;

use crate::message::SensorSample;
use crate::transform::GridCoord;

/// Identifier shown for the tracked robot until the backend names it.
pub const DEFAULT_DEVICE_ID: &str = "IOT-001";

/// Display name shown for the tracked robot.
pub const DEFAULT_DEVICE_NAME: &str = "Indoor Sensor";

/// UI-owned state of the tracked device.
///
/// `rendered_position` is the animated position, which trails the raw
/// channel sample while an interpolation run is in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceRenderState {
    pub id: String,
    pub name: String,
    pub rendered_position: GridCoord,
    pub is_online: bool,
    /// Frame timestamp of the last rendered-position update.
    pub last_update_ms: Option<f64>,
}

impl Default for DeviceRenderState {
    fn default() -> Self {
        Self {
            id: DEFAULT_DEVICE_ID.to_owned(),
            name: DEFAULT_DEVICE_NAME.to_owned(),
            rendered_position: GridCoord::default(),
            is_online: true,
            last_update_ms: None,
        }
    }
}

impl DeviceRenderState {
    /// Position tooltip text, e.g. `(1.5, 0.2)`.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("({:.1}, {:.1})", self.rendered_position.x, self.rendered_position.y)
    }

    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.is_online { "Online" } else { "Offline" }
    }
}

/// Text readout for the device information panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceReadout {
    pub x: String,
    pub y: String,
    /// `ultrasonic1..3`; `-` when the reading is missing.
    pub ultrasonic: [String; 3],
}

impl DeviceReadout {
    /// Build a readout from the rendered device and the latest raw sample.
    #[must_use]
    pub fn new(device: &DeviceRenderState, latest: Option<&SensorSample>) -> Self {
        let readings = latest.map_or([None; 3], SensorSample::readings);
        Self {
            x: format!("{:.1}", device.rendered_position.x),
            y: format!("{:.1}", device.rendered_position.y),
            ultrasonic: readings.map(format_reading),
        }
    }
}

fn format_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v}"))
}
