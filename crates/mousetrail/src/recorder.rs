//! Turns raw input events into a [`Session`].

use std::future::Future;
use std::time::SystemTime;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::RecordingConfig;
use crate::error::Result;
use crate::event::{hover_cell, InputEvent, InputKind, MouseClick, MouseMove, MouseScroll};
use crate::monitor::InputMonitor;
use crate::session::{HoverMap, Session};

/// What the caller should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep feeding events.
    Continue,
    /// The user asked to stop recording.
    Stop,
}

/// Accumulates events for one recording.
#[derive(Debug)]
pub struct Recorder {
    cell_size: u32,
    stop_on_escape: bool,
    started_at: Option<SystemTime>,
    last_timestamp: f64,
    moves: Vec<MouseMove>,
    clicks: Vec<MouseClick>,
    scrolls: Vec<MouseScroll>,
    hover: HoverMap,
}

impl Recorder {
    /// Create an idle recorder.
    #[must_use]
    pub fn new(config: &RecordingConfig) -> Self {
        Self {
            cell_size: config.hover_cell_size,
            stop_on_escape: config.stop_on_escape,
            started_at: None,
            last_timestamp: 0.0,
            moves: Vec::new(),
            clicks: Vec::new(),
            scrolls: Vec::new(),
            hover: HoverMap::new(),
        }
    }

    /// Check whether a recording is in progress.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.started_at.is_some()
    }

    /// Begin a recording at `started_at`, discarding anything buffered.
    pub fn start(&mut self, started_at: SystemTime) {
        self.moves.clear();
        self.clicks.clear();
        self.scrolls.clear();
        self.hover.clear();
        self.last_timestamp = 0.0;
        self.started_at = Some(started_at);
    }

    /// Process one event. Events outside a recording are ignored.
    pub fn handle(&mut self, event: &InputEvent) -> Control {
        let Some(started_at) = self.started_at else {
            return Control::Continue;
        };

        let elapsed = event
            .time
            .duration_since(started_at)
            .map_or(0.0, |d| d.as_secs_f64());
        let timestamp = elapsed.max(self.last_timestamp);
        self.last_timestamp = timestamp;

        match event.kind {
            InputKind::Move { x, y } => self.on_move(x, y, timestamp),
            InputKind::Press(button) | InputKind::Release(button) => {
                let (x, y) = self.position();
                self.clicks.push(MouseClick {
                    x,
                    y,
                    button: button.to_string(),
                    pressed: matches!(event.kind, InputKind::Press(_)),
                    timestamp,
                });
            }
            InputKind::Scroll { dx, dy } => {
                let (x, y) = self.position();
                self.scrolls.push(MouseScroll {
                    x,
                    y,
                    dx,
                    dy,
                    timestamp,
                });
            }
            InputKind::StopKey => {
                if self.stop_on_escape {
                    debug!("Stop key pressed");
                    return Control::Stop;
                }
            }
        }
        Control::Continue
    }

    fn on_move(&mut self, x: f64, y: f64, timestamp: f64) {
        let mut speed = 0.0;
        if let Some(prev) = self.moves.last() {
            let dt = (timestamp - prev.timestamp).max(0.0);
            let cell = hover_cell(prev.x, prev.y, self.cell_size);
            *self.hover.entry(cell).or_insert(0.0) += dt;

            if dt > 0.0 {
                speed = (x - prev.x).hypot(y - prev.y) / dt;
            }
        }

        self.moves.push(MouseMove {
            x,
            y,
            timestamp,
            speed,
        });
    }

    fn position(&self) -> (f64, f64) {
        self.moves.last().map_or((0.0, 0.0), |m| (m.x, m.y))
    }

    /// End the recording and hand back the session.
    ///
    /// Returns `None` when no recording was in progress.
    pub fn stop(&mut self) -> Option<Session> {
        self.started_at.take()?;
        let session = Session::new(
            std::mem::take(&mut self.moves),
            std::mem::take(&mut self.clicks),
            std::mem::take(&mut self.scrolls),
            std::mem::take(&mut self.hover),
        );
        info!(
            "Recording stopped: {} moves, {} clicks, {} scrolls",
            session.moves.len(),
            session.clicks.len(),
            session.scrolls.len()
        );
        Some(session)
    }
}

/// Why a recording ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop key was pressed.
    StopKey,
    /// The shutdown future resolved (Ctrl-C for the CLI).
    Shutdown,
    /// The monitor stopped sending events.
    SourceClosed,
}

/// Record from `monitor` until the stop key, `shutdown`, or the end of the
/// event stream.
///
/// # Errors
///
/// Returns an error if the monitor fails to start.
pub async fn record_until<M, F>(
    monitor: &mut M,
    config: &RecordingConfig,
    shutdown: F,
) -> Result<(Session, StopReason)>
where
    M: InputMonitor + ?Sized,
    F: Future<Output = ()>,
{
    let (tx, mut rx) = mpsc::channel::<InputEvent>(config.channel_capacity);
    let mut recorder = Recorder::new(config);

    recorder.start(SystemTime::now());
    monitor.start(tx).await?;
    info!("Recording started with {} monitor", monitor.monitor_type());

    tokio::pin!(shutdown);
    let reason = loop {
        tokio::select! {
            () = &mut shutdown => break StopReason::Shutdown,
            event = rx.recv() => match event {
                Some(event) => {
                    if recorder.handle(&event) == Control::Stop {
                        break StopReason::StopKey;
                    }
                }
                None => break StopReason::SourceClosed,
            },
        }
    };
    debug!("Recording ended: {reason:?}");

    if monitor.is_running() {
        if let Err(e) = monitor.stop() {
            warn!("Failed to stop monitor: {e}");
        }
    }
    drop(rx);

    let session = recorder.stop().unwrap_or_default();
    Ok((session, reason))
}

/// Record until the stop key or Ctrl-C.
///
/// # Errors
///
/// Returns an error if the monitor fails to start.
pub async fn record_session<M>(monitor: &mut M, config: &RecordingConfig) -> Result<Session>
where
    M: InputMonitor + ?Sized,
{
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let (session, _) = record_until(monitor, config, ctrl_c).await?;
    Ok(session)
}
