//! In-process stand-in for the robot backend.
//!
//! One axum server answers both halves of the backend boundary: any HTTP
//! request is recorded and answered from a canned route table, and
//! `/api/ws` plays a scripted sequence of live messages.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{ConsoleConfig, LIVE_PATH};

/// Upper bound for any single wait in a test.
pub const WAIT: Duration = Duration::from_secs(5);

/// One step of the live-stream script.
#[derive(Debug, Clone)]
pub enum LiveStep {
    Text(String),
    Binary(Vec<u8>),
    Pause(Duration),
    /// Send a close frame and hang up.
    Close,
}

impl LiveStep {
    pub fn text(raw: &str) -> Self {
        Self::Text(raw.to_owned())
    }
}

/// Lifecycle of a live connection as seen by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEvent {
    Opened,
    /// The client sent a close frame or dropped the socket.
    ClientClosed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    routes: Arc<HashMap<String, (StatusCode, Value)>>,
    script: Arc<Vec<LiveStep>>,
    requests: mpsc::UnboundedSender<RecordedRequest>,
    live_events: mpsc::UnboundedSender<LiveEvent>,
}

/// Builder for a [`MockBackend`].
#[derive(Default)]
pub struct MockBuilder {
    routes: HashMap<String, (StatusCode, Value)>,
    script: Vec<LiveStep>,
}

impl MockBuilder {
    /// Answer requests to `path` with `status` and `body`. Unlisted paths get
    /// `200 null`.
    pub fn respond(mut self, path: &str, status: u16, body: Value) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.routes.insert(path.to_owned(), (status, body));
        self
    }

    /// Messages played to every live connection, in order. After the script
    /// the socket stays open until the client hangs up, unless it ends in
    /// [`LiveStep::Close`].
    pub fn live(mut self, script: Vec<LiveStep>) -> Self {
        self.script = script;
        self
    }

    pub async fn start(self) -> MockBackend {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = MockState {
            routes: Arc::new(self.routes),
            script: Arc::new(self.script),
            requests: requests_tx,
            live_events: events_tx,
        };
        let app = Router::new().route(LIVE_PATH, get(live_handler)).fallback(http_handler).with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend failed");
        });
        MockBackend { base_url: format!("http://{addr}"), requests: requests_rx, live_events: events_rx }
    }
}

pub fn mock() -> MockBuilder {
    MockBuilder::default()
}

/// A running mock backend.
pub struct MockBackend {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<RecordedRequest>,
    live_events: mpsc::UnboundedReceiver<LiveEvent>,
}

impl MockBackend {
    pub fn config(&self) -> ConsoleConfig {
        ConsoleConfig::for_backend(&self.base_url).expect("mock config")
    }

    pub fn live_url(&self) -> String {
        self.config().live_url
    }

    /// Next recorded HTTP request.
    pub async fn next_request(&mut self) -> RecordedRequest {
        tokio::time::timeout(WAIT, self.requests.recv())
            .await
            .expect("timed out waiting for request")
            .expect("mock backend stopped")
    }

    /// Whether a request arrives within `within`.
    pub async fn has_request_within(&mut self, within: Duration) -> bool {
        matches!(tokio::time::timeout(within, self.requests.recv()).await, Ok(Some(_)))
    }

    pub async fn next_live_event(&mut self) -> LiveEvent {
        tokio::time::timeout(WAIT, self.live_events.recv())
            .await
            .expect("timed out waiting for live event")
            .expect("mock backend stopped")
    }
}

async fn http_handler(State(state): State<MockState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let body = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap_or(Value::Null) };
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        body,
    };
    // The receiving test may already be gone.
    let _ = state.requests.send(recorded);

    match state.routes.get(uri.path()) {
        Some((status, value)) => (*status, Json(value.clone())).into_response(),
        None => (StatusCode::OK, Json(Value::Null)).into_response(),
    }
}

async fn live_handler(State(state): State<MockState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| play_script(socket, state))
}

async fn play_script(mut socket: WebSocket, state: MockState) {
    let _ = state.live_events.send(LiveEvent::Opened);
    for step in state.script.iter() {
        let sent = match step {
            LiveStep::Text(text) => socket.send(Message::Text(text.clone().into())).await,
            LiveStep::Binary(bytes) => socket.send(Message::Binary(bytes.clone().into())).await,
            LiveStep::Pause(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
            LiveStep::Close => {
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
        };
        if sent.is_err() {
            let _ = state.live_events.send(LiveEvent::ClientClosed);
            return;
        }
    }
    while let Some(message) = socket.recv().await {
        if matches!(message, Ok(Message::Close(_)) | Err(_)) {
            break;
        }
    }
    let _ = state.live_events.send(LiveEvent::ClientClosed);
}
