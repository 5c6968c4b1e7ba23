//! Live-channel wire messages.
//!
//! Each inbound message is a JSON object tagged by `type`. Every tag gets its
//! own variant with its own field set; tags this console does not know about
//! decode to [`LiveMessage::Unknown`] rather than an error, so newer backends
//! can add event kinds without breaking older consoles.
//!
//! Coordinates are clamped into the grid on decode, so everything downstream
//! can rely on `[0, GRID_SIZE]` bounds. A negative ultrasonic reading is the
//! sensor's "no echo" and decodes as a missing reading; the position it came
//! with is kept.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;
use crate::transform::GridCoord;

/// Error returned by [`decode_message`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not JSON, or a known variant is missing a required field.
    #[error("malformed live message: {0}")]
    Json(#[from] serde_json::Error),
}

/// One reported state of the tracked device: position plus ultrasonic ranges.
///
/// Path events may omit the readings, so each is optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSample {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultrasonic1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultrasonic2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultrasonic3: Option<f64>,
}

impl SensorSample {
    /// A sample with a position and no readings.
    #[must_use]
    pub fn at(position: GridCoord) -> Self {
        Self { x: position.x, y: position.y, ..Self::default() }
    }

    #[must_use]
    pub fn position(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }

    /// The three readings in sensor order.
    #[must_use]
    pub fn readings(&self) -> [Option<f64>; 3] {
        [self.ultrasonic1, self.ultrasonic2, self.ultrasonic3]
    }

    /// Clamp the position into the grid and drop "no echo" readings.
    fn normalized(self) -> Self {
        let position = self.position().clamped(GRID_SIZE);
        let echo = |reading: Option<f64>| reading.filter(|value| *value >= 0.0);
        Self {
            x: position.x,
            y: position.y,
            ultrasonic1: echo(self.ultrasonic1),
            ultrasonic2: echo(self.ultrasonic2),
            ultrasonic3: echo(self.ultrasonic3),
        }
    }
}

/// A decoded live-channel event.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum LiveMessage {
    /// A navigation run started at this position.
    #[serde(rename = "rssi_start", alias = "start")]
    Start(SensorSample),
    /// The navigation target changed.
    #[serde(rename = "rssi_target", alias = "target")]
    Target(GridCoord),
    /// The device reported a new position along its path.
    #[serde(rename = "rssi_path", alias = "path")]
    Path(SensorSample),
    /// Any other `type`; carries nothing and changes nothing.
    #[serde(other)]
    Unknown,
}

/// Decode one raw text message.
///
/// # Errors
///
/// Returns [`DecodeError::Json`] for malformed JSON or missing fields.
pub fn decode_message(raw: &str) -> Result<LiveMessage, DecodeError> {
    let message = serde_json::from_str::<LiveMessage>(raw)?;
    match message {
        LiveMessage::Start(sample) => Ok(LiveMessage::Start(sample.normalized())),
        LiveMessage::Path(sample) => Ok(LiveMessage::Path(sample.normalized())),
        LiveMessage::Target(coord) => Ok(LiveMessage::Target(coord.clamped(GRID_SIZE))),
        LiveMessage::Unknown => Ok(LiveMessage::Unknown),
    }
}
