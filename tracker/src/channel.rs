//! Derived state for one live-channel connection.
//!
//! SYSTEM CONTEXT
//! ==============
//! The live channel owns exactly one [`ChannelState`] per connection. Inbound
//! messages are reduced into it one at a time, in arrival order; consumers
//! only ever see it through shared references. A new connection starts from
//! [`ChannelState::default`], which is how the trail gets "cleared".

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use crate::message::{DecodeError, LiveMessage, SensorSample, decode_message};
use crate::transform::GridCoord;

/// Live-channel connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected; the socket is closed or was never opened.
    #[default]
    Disconnected,
    /// The handshake completed and messages may arrive.
    Connected,
}

/// Chronological, append-only history of reported positions.
///
/// Consecutive duplicates are kept; every start/path event is one entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathTrail(Vec<GridCoord>);

impl PathTrail {
    fn push(&mut self, point: GridCoord) {
        self.0.push(point);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recently appended point.
    #[must_use]
    pub fn last(&self) -> Option<GridCoord> {
        self.0.last().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[GridCoord] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCoord> {
        self.0.iter()
    }
}

/// Which parts of [`ChannelState`] a single message touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateChange {
    /// `start_point` was overwritten.
    pub start: bool,
    /// `target_point` was overwritten.
    pub target: bool,
    /// A point was appended to the trail (and `latest_sample` overwritten).
    pub trail: bool,
}

impl StateChange {
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.start || self.target || self.trail)
    }
}

/// Everything derived from the live stream during one connection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelState {
    status: ConnectionStatus,
    start_point: Option<SensorSample>,
    target_point: Option<GridCoord>,
    path_trail: PathTrail,
    latest_sample: Option<SensorSample>,
}

impl ChannelState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Where the current navigation run started, with the readings at the time.
    #[must_use]
    pub fn start_point(&self) -> Option<SensorSample> {
        self.start_point
    }

    #[must_use]
    pub fn target_point(&self) -> Option<GridCoord> {
        self.target_point
    }

    #[must_use]
    pub fn path_trail(&self) -> &PathTrail {
        &self.path_trail
    }

    /// The last start/path sample; its position always equals the trail tail.
    #[must_use]
    pub fn latest_sample(&self) -> Option<SensorSample> {
        self.latest_sample
    }

    // --- Transitions ---

    /// Record a completed handshake. Returns whether the status changed.
    pub fn mark_connected(&mut self) -> bool {
        self.set_status(ConnectionStatus::Connected)
    }

    /// Record a closed connection. Returns whether the status changed, so a
    /// second close is a no-op.
    pub fn mark_disconnected(&mut self) -> bool {
        self.set_status(ConnectionStatus::Disconnected)
    }

    fn set_status(&mut self, status: ConnectionStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }

    /// Reduce one decoded message into the state.
    pub fn apply(&mut self, message: LiveMessage) -> StateChange {
        match message {
            LiveMessage::Start(sample) => {
                self.start_point = Some(sample);
                self.record_sample(sample);
                StateChange { start: true, trail: true, ..StateChange::default() }
            }
            LiveMessage::Target(coord) => {
                self.target_point = Some(coord);
                StateChange { target: true, ..StateChange::default() }
            }
            LiveMessage::Path(sample) => {
                self.record_sample(sample);
                StateChange { trail: true, ..StateChange::default() }
            }
            LiveMessage::Unknown => StateChange::default(),
        }
    }

    /// Decode and reduce one raw message. On error the state is untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`DecodeError`] from [`decode_message`].
    pub fn ingest(&mut self, raw: &str) -> Result<StateChange, DecodeError> {
        let message = decode_message(raw)?;
        Ok(self.apply(message))
    }

    fn record_sample(&mut self, sample: SensorSample) {
        self.path_trail.push(sample.position());
        self.latest_sample = Some(sample);
    }
}
