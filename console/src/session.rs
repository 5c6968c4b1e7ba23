//! Tracking session: the console's map page without the pixels.
//!
//! A [`TrackingSession`] owns one [`LiveChannel`], one [`TrackingView`] and
//! one [`DriveController`]. It is the single writer of the rendered device
//! state: frames are driven through `&mut self`, so there is nothing to lock.
//! Operator intent (a target click, a drive key) is forwarded to the backend
//! on spawned tasks whose failures are logged and otherwise dropped.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracker::channel::ChannelState;
use tracker::device::DeviceReadout;
use tracker::drive::{Direction, DriveCommand, DriveController, KeyPhase};
use tracker::tracking::{Action, TrackingView};
use tracker::transform::{GridCoord, GridViewport, Point};

use crate::api::BackendApi;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::live::LiveChannel;

/// Animation frame period, roughly 60 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct TrackingSession {
    api: BackendApi,
    channel: LiveChannel,
    state: watch::Receiver<ChannelState>,
    view: TrackingView,
    drive: DriveController,
    frames: Interval,
    clock: Instant,
    pending: JoinSet<()>,
}

impl TrackingSession {
    /// Open the live channel and start the frame clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn start(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let api = BackendApi::new(config)?;
        let channel = LiveChannel::open(config.live_url.clone());
        let mut state = channel.subscribe();
        state.mark_changed();
        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(live_url = %config.live_url, backend_url = %config.backend_url, "tracking session started");
        Ok(Self {
            api,
            channel,
            state,
            view: TrackingView::new(config.viewport),
            drive: DriveController::new(),
            frames,
            clock: Instant::now(),
            pending: JoinSet::new(),
        })
    }

    // --- Queries ---

    #[must_use]
    pub fn view(&self) -> &TrackingView {
        &self.view
    }

    /// Borrow the live channel state. Do not hold the guard across an
    /// `.await`; the connection task cannot publish while it is alive.
    #[must_use]
    pub fn channel_state(&self) -> watch::Ref<'_, ChannelState> {
        self.state.borrow()
    }

    #[must_use]
    pub fn drive(&self) -> &DriveController {
        &self.drive
    }

    /// Device panel text: rendered position plus the latest raw readings.
    #[must_use]
    pub fn readout(&self) -> DeviceReadout {
        DeviceReadout::new(self.view.device(), self.state.borrow().latest_sample().as_ref())
    }

    /// Milliseconds since the session started; the frame timestamp.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    // --- Frames ---

    /// Wait for the next frame tick, then fold in channel changes and advance
    /// the animations.
    ///
    /// The channel state is only read when the connection task published
    /// something since the last frame. Once that task has exited the state is
    /// final and is still observed, through a borrow.
    pub async fn tick(&mut self) -> Action {
        self.frames.tick().await;
        self.reap_finished();
        let now = self.now_ms();
        let observed = match self.state.has_changed() {
            Ok(false) => Action::None,
            Ok(true) | Err(_) => self.view.observe(&self.state.borrow_and_update(), now),
        };
        let framed = self.view.on_frame(now);
        if observed == Action::RenderNeeded || framed == Action::RenderNeeded {
            Action::RenderNeeded
        } else {
            Action::None
        }
    }

    /// Run frames for `duration`, calling `on_render` after each frame that
    /// changed something visible.
    pub async fn run_for(&mut self, duration: Duration, mut on_render: impl FnMut(&Self)) {
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            if self.tick().await == Action::RenderNeeded {
                on_render(self);
            }
        }
    }

    // --- Pointer ---

    pub fn pointer_move(&mut self, pixel: Point) -> Action {
        self.view.on_pointer_move(pixel)
    }

    pub fn pointer_leave(&mut self) -> Action {
        self.view.on_pointer_leave()
    }

    /// Submit the hovered coordinate as the navigation target.
    ///
    /// The request runs in the background; the chosen coordinate is returned
    /// immediately as the operator confirmation.
    pub fn click(&mut self) -> Option<GridCoord> {
        let Action::SubmitTarget(coord) = self.view.on_click() else {
            return None;
        };
        info!(x = coord.x, y = coord.y, "submitting navigation target");
        let api = self.api.clone();
        self.pending.spawn(async move {
            if let Err(error) = api.set_target_point(coord).await {
                warn!(%error, x = coord.x, y = coord.y, "target submission failed");
            }
        });
        Some(coord)
    }

    // --- Drive ---

    pub fn set_drive_mode(&mut self, on: bool) -> Option<DriveCommand> {
        let command = self.drive.set_drive_mode(on, self.now_ms());
        self.dispatch_drive(command)
    }

    pub fn key(&mut self, key: Direction, phase: KeyPhase) -> Option<DriveCommand> {
        let now = self.now_ms();
        let command = match phase {
            KeyPhase::Down => self.drive.press(key, now),
            KeyPhase::Up => self.drive.release(key, now),
        };
        self.dispatch_drive(command)
    }

    /// Focus loss: release whatever key is held.
    pub fn release_all(&mut self) -> Option<DriveCommand> {
        let command = self.drive.release_all(self.now_ms());
        self.dispatch_drive(command)
    }

    fn dispatch_drive(&mut self, command: Option<DriveCommand>) -> Option<DriveCommand> {
        let command = command?;
        let api = self.api.clone();
        self.pending.spawn(async move {
            match api.drive(command).await {
                Ok(reply) => debug!(?command, %reply, "drive command sent"),
                Err(error) => warn!(%error, ?command, "drive command failed"),
            }
        });
        Some(command)
    }

    /// Collect background requests that already finished.
    fn reap_finished(&mut self) {
        while let Some(joined) = self.pending.try_join_next() {
            if let Err(error) = joined {
                warn!(%error, "background request task failed");
            }
        }
    }

    /// Background requests still in flight.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    // --- Teardown ---

    /// Wait for every in-flight backend request to finish.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.pending.join_next().await {
            if let Err(error) = joined {
                warn!(%error, "background request task failed");
            }
        }
    }

    /// Stop animations, release any held drive key, close the live channel and
    /// abort outstanding requests.
    pub async fn shutdown(mut self) {
        self.view.cancel_animations();
        if let Some(command) = self.drive.release_all(self.now_ms()) {
            if let Err(error) = self.api.drive(command).await {
                warn!(%error, ?command, "releasing drive key on shutdown failed");
            }
        }
        self.channel.close().await;
        self.pending.shutdown().await;
        info!("tracking session closed");
    }
}

/// The target a click at `pixel` would submit on a map of `viewport`.
///
/// Needs no live channel, so one-shot callers can skip opening a session.
#[must_use]
pub fn pick_target(viewport: GridViewport, pixel: Point) -> Option<GridCoord> {
    let mut view = TrackingView::new(viewport);
    view.on_pointer_move(pixel);
    match view.on_click() {
        Action::SubmitTarget(coord) => Some(coord),
        Action::None | Action::RenderNeeded => None,
    }
}
