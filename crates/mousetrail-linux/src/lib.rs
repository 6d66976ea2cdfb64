//! Linux-specific implementation for mousetrail
//!
//! This crate provides Linux-specific functionality for the mousetrail project:
//! detecting which display server the session runs on, since global mouse
//! capture only works through X11.

#![cfg(target_os = "linux")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fmt;

/// The display server the current session is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    /// An X11 server (`DISPLAY` is set).
    X11,
    /// A Wayland compositor. XWayland may still provide `DISPLAY`.
    Wayland {
        /// Whether an XWayland display is available.
        xwayland: bool,
    },
    /// No graphical session (SSH, console, CI).
    None,
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X11 => write!(f, "X11"),
            Self::Wayland { xwayland: true } => write!(f, "Wayland (XWayland available)"),
            Self::Wayland { xwayland: false } => write!(f, "Wayland"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Whether global mouse capture can work in this session, and why not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSupport {
    /// True when a global input hook is expected to receive events.
    pub supported: bool,
    /// Human-readable explanation.
    pub message: String,
}

/// Initialize Linux-specific components
///
/// # Errors
///
/// Returns an error if initialization fails
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Initializing Linux platform components ({})", display_server());
    Ok(())
}

/// Get platform name
#[must_use]
pub fn platform_name() -> &'static str {
    "Linux"
}

/// Detect the display server from the process environment.
#[must_use]
pub fn display_server() -> DisplayServer {
    detect_display_server(|key| std::env::var(key).ok())
}

/// Report whether global capture is expected to work in this session.
#[must_use]
pub fn capture_support() -> CaptureSupport {
    support_for(display_server())
}

fn detect_display_server(var: impl Fn(&str) -> Option<String>) -> DisplayServer {
    let set = |key: &str| var(key).is_some_and(|v| !v.is_empty());

    let wayland = set("WAYLAND_DISPLAY")
        || var("XDG_SESSION_TYPE").is_some_and(|v| v.eq_ignore_ascii_case("wayland"));
    let x11 = set("DISPLAY");

    match (wayland, x11) {
        (true, xwayland) => DisplayServer::Wayland { xwayland },
        (false, true) => DisplayServer::X11,
        (false, false) => DisplayServer::None,
    }
}

fn support_for(server: DisplayServer) -> CaptureSupport {
    match server {
        DisplayServer::X11 => CaptureSupport {
            supported: true,
            message: "X11 session: global mouse capture available".to_string(),
        },
        DisplayServer::Wayland { xwayland: true } => CaptureSupport {
            supported: true,
            message: "Wayland session: only pointer activity over XWayland windows is visible"
                .to_string(),
        },
        DisplayServer::Wayland { xwayland: false } => CaptureSupport {
            supported: false,
            message: "Wayland session without XWayland: global mouse capture is not possible"
                .to_string(),
        },
        DisplayServer::None => CaptureSupport {
            supported: false,
            message: "No graphical session detected (DISPLAY is not set)".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| {
            owned
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }

    #[test]
    fn test_platform_name() {
        assert_eq!(platform_name(), "Linux");
    }

    #[test]
    fn test_detect_x11() {
        let server = detect_display_server(env(&[("DISPLAY", ":0")]));
        assert_eq!(server, DisplayServer::X11);
        assert!(support_for(server).supported);
    }

    #[test]
    fn test_detect_wayland_with_xwayland() {
        let server =
            detect_display_server(env(&[("WAYLAND_DISPLAY", "wayland-0"), ("DISPLAY", ":1")]));
        assert_eq!(server, DisplayServer::Wayland { xwayland: true });
        assert!(support_for(server).supported);
    }

    #[test]
    fn test_detect_wayland_from_session_type() {
        let server = detect_display_server(env(&[("XDG_SESSION_TYPE", "wayland")]));
        assert_eq!(server, DisplayServer::Wayland { xwayland: false });
        assert!(!support_for(server).supported);
    }

    #[test]
    fn test_detect_none() {
        let server = detect_display_server(env(&[("DISPLAY", "")]));
        assert_eq!(server, DisplayServer::None);

        let support = support_for(server);
        assert!(!support.supported);
        assert!(support.message.contains("DISPLAY"));
    }

    #[test]
    fn test_display_server_display() {
        assert_eq!(DisplayServer::X11.to_string(), "X11");
        assert_eq!(DisplayServer::None.to_string(), "none");
        assert!(DisplayServer::Wayland { xwayland: true }
            .to_string()
            .contains("XWayland"));
    }
}
