//! Global input hook backed by `rdev`.
//!
//! Only compiled with the `input-hook` feature. `rdev::listen` blocks its
//! thread for the life of the process and cannot be cancelled, so stopping
//! the monitor makes the callback discard events; the thread itself idles
//! until exit.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::event::{Button, InputEvent, InputKind};
use crate::monitor::{
    InputMonitor, MonitorError, MonitorHandle, MonitorType, Result,
};

/// How long `start` waits for the hook to report an immediate failure.
const STARTUP_GRACE: Duration = Duration::from_millis(250);

/// Monitor reading global mouse and keyboard events.
#[derive(Debug)]
pub struct HookMonitor {
    handle: MonitorHandle,
    running: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
}

impl HookMonitor {
    /// Create a stopped hook monitor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: MonitorHandle::new(MonitorType::Hook),
            running: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Events discarded because the channel was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for HookMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InputMonitor for HookMonitor {
    fn monitor_type(&self) -> MonitorType {
        MonitorType::Hook
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn start(&mut self, tx: mpsc::Sender<InputEvent>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }
        self.handle.reset();

        let handle = self.handle.clone();
        let dropped = Arc::clone(&self.dropped);
        let running = Arc::clone(&self.running);
        let (fail_tx, fail_rx) = oneshot::channel::<String>();

        let spawned = std::thread::Builder::new()
            .name("mousetrail-hook".to_string())
            .spawn(move || {
                let callback_handle = handle.clone();
                let result = rdev::listen(move |event| {
                    if callback_handle.should_stop() {
                        return;
                    }
                    let Some(kind) = translate(&event.event_type) else {
                        return;
                    };
                    let input = InputEvent {
                        time: event.time,
                        kind,
                    };
                    match tx.try_send(input) {
                        Ok(()) => callback_handle.record_event(),
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => callback_handle.stop(),
                    }
                });
                running.store(false, Ordering::SeqCst);
                if let Err(e) = result {
                    let _ = fail_tx.send(format!("{e:?}"));
                }
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(MonitorError::StartFailed(e.to_string()));
        }

        // listen() only returns on failure, which happens right away
        match tokio::time::timeout(STARTUP_GRACE, fail_rx).await {
            Ok(Ok(reason)) => {
                warn!("Input hook failed: {reason}");
                Err(MonitorError::StartFailed(reason))
            }
            _ => {
                debug!("Input hook listening");
                Ok(())
            }
        }
    }

    fn stop(&self) -> Result<()> {
        if !self.is_running() {
            return Err(MonitorError::NotRunning);
        }
        self.handle.stop();
        self.running.store(false, Ordering::SeqCst);
        debug!(
            "Input hook stopped after {} events ({} dropped)",
            self.handle.event_count(),
            self.dropped_events()
        );
        Ok(())
    }
}

fn translate(event: &rdev::EventType) -> Option<InputKind> {
    match event {
        rdev::EventType::MouseMove { x, y } => Some(InputKind::Move { x: *x, y: *y }),
        rdev::EventType::ButtonPress(b) => Some(InputKind::Press(button(*b))),
        rdev::EventType::ButtonRelease(b) => Some(InputKind::Release(button(*b))),
        rdev::EventType::Wheel { delta_x, delta_y } => Some(InputKind::Scroll {
            dx: *delta_x,
            dy: *delta_y,
        }),
        rdev::EventType::KeyPress(rdev::Key::Escape) => Some(InputKind::StopKey),
        _ => None,
    }
}

fn button(b: rdev::Button) -> Button {
    match b {
        rdev::Button::Left => Button::Left,
        rdev::Button::Right => Button::Right,
        rdev::Button::Middle => Button::Middle,
        rdev::Button::Unknown(_) => Button::Unknown,
    }
}

/// Size of the main display in pixels, if the platform reports one.
#[must_use]
pub fn display_size() -> Option<(u32, u32)> {
    match rdev::display_size() {
        Ok((w, h)) if w > 0 && h > 0 => Some((w as u32, h as u32)),
        Ok(_) => None,
        Err(e) => {
            debug!("Display size unavailable: {e:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_mouse_events() {
        assert_eq!(
            translate(&rdev::EventType::MouseMove { x: 3.0, y: 4.0 }),
            Some(InputKind::Move { x: 3.0, y: 4.0 })
        );
        assert_eq!(
            translate(&rdev::EventType::ButtonPress(rdev::Button::Left)),
            Some(InputKind::Press(Button::Left))
        );
        assert_eq!(
            translate(&rdev::EventType::ButtonRelease(rdev::Button::Unknown(8))),
            Some(InputKind::Release(Button::Unknown))
        );
        assert_eq!(
            translate(&rdev::EventType::Wheel {
                delta_x: 0,
                delta_y: -1
            }),
            Some(InputKind::Scroll { dx: 0, dy: -1 })
        );
    }

    #[test]
    fn test_translate_keys() {
        assert_eq!(
            translate(&rdev::EventType::KeyPress(rdev::Key::Escape)),
            Some(InputKind::StopKey)
        );
        assert_eq!(translate(&rdev::EventType::KeyPress(rdev::Key::KeyA)), None);
        assert_eq!(translate(&rdev::EventType::KeyRelease(rdev::Key::Escape)), None);
    }

    #[test]
    fn test_new_monitor_is_stopped() {
        let monitor = HookMonitor::new();
        assert!(!monitor.is_running());
        assert_eq!(monitor.dropped_events(), 0);
        assert!(matches!(monitor.stop(), Err(MonitorError::NotRunning)));
    }
}
