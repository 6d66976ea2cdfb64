//! Platform-agnostic input monitoring abstraction.
//!
//! An [`InputMonitor`] delivers raw [`InputEvent`]s into a channel. The
//! global hook lives in [`crate::hook`]; [`ReplayMonitor`] plays back a
//! prepared list of events and backs the recorder tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::InputEvent;

/// Errors that can occur during input monitoring.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitor failed to start.
    #[error("failed to start monitor: {0}")]
    StartFailed(String),

    /// The monitor is already running.
    #[error("monitor already running")]
    AlreadyRunning,

    /// The monitor is not running.
    #[error("monitor not running")]
    NotRunning,
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// The kind of input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorType {
    /// Global OS input hook.
    Hook,

    /// Playback of prepared events.
    Replay,
}

impl std::fmt::Display for MonitorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hook => write!(f, "hook"),
            Self::Replay => write!(f, "replay"),
        }
    }
}

/// A source of raw input events.
///
/// `start` sets up delivery and returns; events then arrive on `tx` until
/// [`InputMonitor::stop`] is called or the receiver is dropped.
#[async_trait::async_trait]
pub trait InputMonitor: Send + Sync {
    /// Get the type of this monitor.
    fn monitor_type(&self) -> MonitorType;

    /// Check if the monitor is currently running.
    fn is_running(&self) -> bool;

    /// Start delivering events.
    ///
    /// # Errors
    ///
    /// Returns an error if the monitor is already running or cannot start.
    async fn start(&mut self, tx: mpsc::Sender<InputEvent>) -> Result<()>;

    /// Stop delivering events.
    ///
    /// # Errors
    ///
    /// Returns an error if the monitor was not running.
    fn stop(&self) -> Result<()>;
}

/// Shared stop flag and event counter for a monitor.
///
/// Cloning is cheap; all clones observe the same state, so the delivery
/// thread or task can hold one while the owner holds another.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    monitor_type: MonitorType,
    stop_signal: Arc<AtomicBool>,
    events: Arc<AtomicU64>,
}

impl MonitorHandle {
    /// Create a new monitor handle.
    #[must_use]
    pub fn new(monitor_type: MonitorType) -> Self {
        Self {
            monitor_type,
            stop_signal: Arc::new(AtomicBool::new(false)),
            events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the monitor type.
    #[must_use]
    pub fn monitor_type(&self) -> MonitorType {
        self.monitor_type
    }

    /// Signal the monitor to stop.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }

    /// Reset the stop signal.
    pub fn reset(&self) {
        self.stop_signal.store(false, Ordering::SeqCst);
    }

    /// Count one delivered event.
    pub fn record_event(&self) {
        self.events.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of events delivered.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }
}

/// Plays back a fixed list of events, then closes its side of the channel.
#[derive(Debug)]
pub struct ReplayMonitor {
    events: Vec<InputEvent>,
    interval: Duration,
    handle: MonitorHandle,
    running: Arc<AtomicBool>,
}

impl ReplayMonitor {
    /// Create a monitor that sends `events` back to back.
    #[must_use]
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events,
            interval: Duration::ZERO,
            handle: MonitorHandle::new(MonitorType::Replay),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pause between events.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Handle shared with the playback task.
    #[must_use]
    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }
}

#[async_trait::async_trait]
impl InputMonitor for ReplayMonitor {
    fn monitor_type(&self) -> MonitorType {
        MonitorType::Replay
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn start(&mut self, tx: mpsc::Sender<InputEvent>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }
        self.handle.reset();

        let events = std::mem::take(&mut self.events);
        let interval = self.interval;
        let handle = self.handle.clone();
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            for event in events {
                if handle.should_stop() {
                    break;
                }
                if tx.send(event).await.is_err() {
                    debug!("Replay receiver closed");
                    break;
                }
                handle.record_event();
                if !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
            }
            running.store(false, Ordering::SeqCst);
            debug!("Replay finished after {} events", handle.event_count());
        });

        Ok(())
    }

    fn stop(&self) -> Result<()> {
        if !self.is_running() {
            return Err(MonitorError::NotRunning);
        }
        self.handle.stop();
        Ok(())
    }
}
