//! `mousetrail` - Mouse activity recorder with heatmap rendering
//!
//! This library records pointer movement, clicks, scrolls and hover time into
//! sessions, stores them as JSON files, and renders a smoothed movement
//! heatmap and an HTML analytics dashboard from them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
#[cfg(feature = "input-hook")]
pub mod hook;
pub mod logging;
pub mod monitor;
pub mod platform;
pub mod recorder;
pub mod render;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Button, InputEvent, InputKind, MouseClick, MouseMove, MouseScroll};
pub use logging::init_logging;
pub use recorder::{record_session, record_until, Control, Recorder, StopReason};
pub use session::{Session, SessionStats, SessionStore};
