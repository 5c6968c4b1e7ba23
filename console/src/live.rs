//! Live event channel: one WebSocket connection feeding [`ChannelState`].
//!
//! SYSTEM CONTEXT
//! ==============
//! [`LiveChannel::open`] spawns exactly one connection task. That task is the
//! only writer of the channel state; it reduces inbound frames one at a time,
//! in arrival order, and publishes through a `watch` channel. Owners read
//! snapshots with [`LiveChannel::state`] or follow changes through
//! [`LiveChannel::subscribe`].
//!
//! ERROR HANDLING
//! ==============
//! Unparseable messages are logged and dropped; the connection stays open.
//! Connect failures and transport errors leave the status `Disconnected`.
//! There is no reconnect: a fresh `LiveChannel` starts from empty state.
//! Dropping the handle signals the task to close the socket.

#[cfg(test)]
#[path = "live_test.rs"]
mod live_test;

use futures_util::StreamExt;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use tracker::channel::{ChannelState, ConnectionStatus, StateChange};

/// Handle to a live positional stream.
#[derive(Debug)]
pub struct LiveChannel {
    url: String,
    state: watch::Receiver<ChannelState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LiveChannel {
    /// Start connecting to `url` in the background. Must be called inside a
    /// tokio runtime.
    #[must_use]
    pub fn open(url: impl Into<String>) -> Self {
        let url = url.into();
        let (state_tx, state_rx) = watch::channel(ChannelState::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_connection(url.clone(), state_tx, shutdown_rx));
        Self { url, state: state_rx, shutdown: Some(shutdown_tx), task: Some(task) }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.state.borrow().status()
    }

    /// A receiver that is notified whenever the state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Close the socket and wait for the connection task to finish.
    ///
    /// Calling this again is a no-op.
    pub async fn close(&mut self) {
        self.signal_shutdown();
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                warn!(%error, "live channel task failed");
            }
        }
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            if tx.send(()).is_err() {
                debug!("live channel task already exited");
            }
        }
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

async fn run_connection(url: String, state: watch::Sender<ChannelState>, mut shutdown: oneshot::Receiver<()>) {
    let connected = tokio::select! {
        result = connect_async(url.as_str()) => result,
        _ = &mut shutdown => {
            debug!(%url, "live channel closed before connecting");
            return;
        }
    };
    let mut stream = match connected {
        Ok((stream, _response)) => stream,
        Err(error) => {
            warn!(%url, %error, "live channel connect failed");
            state.send_if_modified(ChannelState::mark_disconnected);
            return;
        }
    };

    info!(%url, "live channel connected");
    state.send_if_modified(ChannelState::mark_connected);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(error) = stream.close(None).await {
                    debug!(%error, "live channel close handshake failed");
                }
                break;
            }
            next = stream.next() => match next {
                Some(Ok(message)) => {
                    if !handle_message(&state, message) {
                        break;
                    }
                }
                Some(Err(error)) => {
                    warn!(%error, "live channel transport error");
                    break;
                }
                None => break,
            }
        }
    }

    state.send_if_modified(ChannelState::mark_disconnected);
    info!(%url, "live channel disconnected");
}

/// Apply one frame. Returns `false` when the peer closed the connection.
fn handle_message(state: &watch::Sender<ChannelState>, message: Message) -> bool {
    match message {
        Message::Text(text) => ingest(state, text.as_str()),
        Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
            Ok(text) => ingest(state, text),
            Err(error) => warn!(%error, len = bytes.len(), "dropping non-UTF-8 live message"),
        },
        Message::Close(frame) => {
            info!(?frame, "live channel closed by peer");
            return false;
        }
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
    }
    true
}

fn ingest(state: &watch::Sender<ChannelState>, raw: &str) {
    let mut outcome = Ok(StateChange::default());
    state.send_if_modified(|s| {
        outcome = s.ingest(raw);
        matches!(&outcome, Ok(change) if !change.is_empty())
    });
    match outcome {
        Ok(change) if change.is_empty() => debug!(raw, "ignoring live message of unknown type"),
        Ok(change) => debug!(?change, "live message applied"),
        Err(error) => warn!(%error, raw, "dropping unparseable live message"),
    }
}
