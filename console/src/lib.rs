//! Native runtime for the robot operator console.
//!
//! Wraps the pure [`tracker`] core with the I/O it needs: the live WebSocket
//! stream ([`live`]), the backend REST API ([`api`]), a frame-driven tracking
//! session ([`session`]), and shaping for the logs and monitoring history
//! pages ([`history`]). The `rssi-console` binary exposes all of it as CLI
//! subcommands.

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod live;
pub mod session;

#[cfg(test)]
pub mod test_helpers;

pub use error::ConsoleError;
