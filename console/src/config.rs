//! Console configuration: backend origin, live-channel URL, timeouts and
//! map geometry.
//!
//! Values come from CLI flags with environment fallbacks ([`ConfigArgs`]) and
//! are resolved once into a [`ConsoleConfig`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use clap::Args;
use tracker::consts::{DEFAULT_CANVAS_HEIGHT_PX, DEFAULT_CANVAS_WIDTH_PX};
use tracker::transform::GridViewport;

use crate::error::ConsoleError;

/// Path of the live positional stream on the backend host.
pub const LIVE_PATH: &str = "/api/ws";

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Global flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Backend HTTP origin.
    #[arg(long, global = true, env = "ROBOT_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Live-channel WebSocket URL. Derived from the backend URL when unset.
    #[arg(long, global = true, env = "ROBOT_LIVE_URL")]
    pub live_url: Option<String>,

    #[arg(long, global = true, env = "ROBOT_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Map canvas width in pixels.
    #[arg(long, global = true, default_value_t = DEFAULT_CANVAS_WIDTH_PX)]
    pub canvas_width: f64,

    /// Map canvas height in pixels.
    #[arg(long, global = true, default_value_t = DEFAULT_CANVAS_HEIGHT_PX)]
    pub canvas_height: f64,
}

impl ConfigArgs {
    /// Validate the flags and derive anything left unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidBaseUrl`] when the backend URL is not
    /// `http(s)://` and no live URL was given, and
    /// [`ConsoleError::InvalidArgument`] when the canvas cannot hold the
    /// padded grid.
    pub fn resolve(self) -> Result<ConsoleConfig, ConsoleError> {
        let backend_url = self.backend_url.trim_end_matches('/').to_owned();
        let live_url = match self.live_url.filter(|s| !s.is_empty()) {
            Some(url) => url,
            None => ws_url(&backend_url)?,
        };

        let viewport = GridViewport::with_size(self.canvas_width, self.canvas_height);
        if viewport.usable_width() <= 0.0 || viewport.usable_height() <= 0.0 {
            return Err(ConsoleError::InvalidArgument(format!(
                "canvas {}x{} is smaller than twice the {} px padding",
                self.canvas_width, self.canvas_height, viewport.padding
            )));
        }

        Ok(ConsoleConfig {
            backend_url,
            live_url,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            viewport,
        })
    }
}

/// Resolved console configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Backend origin without a trailing slash.
    pub backend_url: String,
    pub live_url: String,
    /// Per-request timeout for the backend HTTP client.
    pub request_timeout: Duration,
    pub viewport: GridViewport,
}

impl ConsoleConfig {
    /// Defaults for a backend at `backend_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidBaseUrl`] if `backend_url` is not
    /// `http(s)://`.
    pub fn for_backend(backend_url: &str) -> Result<Self, ConsoleError> {
        let backend_url = backend_url.trim_end_matches('/').to_owned();
        Ok(Self {
            live_url: ws_url(&backend_url)?,
            backend_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            viewport: GridViewport::default(),
        })
    }
}

/// Map an HTTP origin to its live-channel WebSocket URL.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidBaseUrl`] for any scheme other than
/// `http://` or `https://`.
pub fn ws_url(base_url: &str) -> Result<String, ConsoleError> {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}{LIVE_PATH}"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}{LIVE_PATH}"));
    }
    Err(ConsoleError::InvalidBaseUrl(base_url.to_owned()))
}
