//! Console error type.
//!
//! ERROR HANDLING
//! ==============
//! Every fallible console operation returns [`ConsoleError`]. The binary
//! propagates it out of `main`; the tracking session logs it and carries on
//! when the failure belongs to a fire-and-forget submission.

/// Errors from the backend HTTP client, the live channel, and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned HTTP {status} for {path}: {body}")]
    Status { path: String, status: u16, body: String },
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("live channel is closed")]
    ChannelClosed,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ConsoleError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WsConnect(Box::new(error))
    }
}
