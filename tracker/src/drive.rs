//! Edge-triggered WASD drive controller.
//!
//! Manual driving is only live while drive mode is on, and only one key may be
//! held at a time. Each accepted key-down or key-up produces exactly one
//! [`DriveCommand`] for the motor endpoint; repeats and stray releases
//! produce nothing.

#[cfg(test)]
#[path = "drive_test.rs"]
mod drive_test;

use serde::{Deserialize, Serialize};

use crate::consts::DRIVE_RELEASE_DEBOUNCE_MS;

/// A drive key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward.
    W,
    /// Left.
    A,
    /// Backward.
    S,
    /// Right.
    D,
}

impl Direction {
    /// Parse a key name as reported by a keyboard event, ignoring case.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(Self::W),
            "a" => Some(Self::A),
            "s" => Some(Self::S),
            "d" => Some(Self::D),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W => "w",
            Self::A => "a",
            Self::S => "s",
            Self::D => "d",
        }
    }

    /// Human-readable motion, e.g. `Forward`.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::W => "Forward",
            Self::A => "Left",
            Self::S => "Backward",
            Self::D => "Right",
        }
    }
}

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Body of a `POST /motor/drive` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub direction: Direction,
    /// `true` on key-down (start moving), `false` on key-up (stop).
    pub enable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct KeyEvent {
    key: Direction,
    phase: KeyPhase,
    at_ms: f64,
}

/// Drive-mode switch plus the single active key.
#[derive(Debug, Clone, Default)]
pub struct DriveController {
    drive_mode: bool,
    active_key: Option<Direction>,
    last_event: Option<KeyEvent>,
}

impl DriveController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn drive_mode(&self) -> bool {
        self.drive_mode
    }

    #[must_use]
    pub fn active_key(&self) -> Option<Direction> {
        self.active_key
    }

    /// Last emitted key event, for the "Last: W down" readout.
    #[must_use]
    pub fn last(&self) -> Option<(Direction, KeyPhase)> {
        self.last_event.map(|e| (e.key, e.phase))
    }

    /// Toggle drive mode. Turning it off releases the held key.
    pub fn set_drive_mode(&mut self, on: bool, now_ms: f64) -> Option<DriveCommand> {
        let released = if on { None } else { self.release_all(now_ms) };
        self.drive_mode = on;
        released
    }

    /// A key went down. Ignored outside drive mode or while another key is held.
    pub fn press(&mut self, key: Direction, now_ms: f64) -> Option<DriveCommand> {
        if !self.drive_mode || self.active_key.is_some() {
            return None;
        }
        self.active_key = Some(key);
        self.emit(key, KeyPhase::Down, now_ms)
    }

    /// A key came up. Only the held key releases.
    pub fn release(&mut self, key: Direction, now_ms: f64) -> Option<DriveCommand> {
        if self.active_key != Some(key) {
            return None;
        }
        let command = self.emit(key, KeyPhase::Up, now_ms);
        self.active_key = None;
        command
    }

    /// Release whatever is held (window blur, tab hidden, drive mode off).
    pub fn release_all(&mut self, now_ms: f64) -> Option<DriveCommand> {
        let key = self.active_key?;
        self.release(key, now_ms)
    }

    fn emit(&mut self, key: Direction, phase: KeyPhase, now_ms: f64) -> Option<DriveCommand> {
        if phase == KeyPhase::Up
            && let Some(last) = self.last_event
            && last.key == key
            && last.phase == KeyPhase::Up
            && now_ms - last.at_ms < DRIVE_RELEASE_DEBOUNCE_MS
        {
            return None;
        }
        self.last_event = Some(KeyEvent { key, phase, at_ms: now_ms });
        Some(DriveCommand { direction: key, enable: phase == KeyPhase::Down })
    }
}
