//! Glue between the library and the per-OS helper crates.

use crate::config::ScreenConfig;
use crate::error::{Error, Result};
use crate::monitor::InputMonitor;

#[cfg(target_os = "linux")]
use mousetrail_linux as imp;

#[cfg(target_os = "macos")]
use mousetrail_mac as imp;

/// Human-readable platform name.
#[must_use]
pub fn name() -> &'static str {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        imp::platform_name()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        std::env::consts::OS
    }
}

/// Run platform initialization.
///
/// # Errors
///
/// Returns [`Error::Platform`] if the platform crate fails to initialize.
pub fn init() -> Result<()> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        imp::init().map_err(|e| Error::platform(e.to_string()))
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Ok(())
    }
}

/// Whether this binary was built with the global input hook.
#[must_use]
pub const fn capture_compiled() -> bool {
    cfg!(feature = "input-hook")
}

/// Check that global input capture can work in this session.
///
/// # Errors
///
/// Returns [`Error::InputUnavailable`] when the build or display server
/// cannot capture input, and [`Error::PermissionMissing`] when the OS has
/// not granted the needed permission.
pub fn capture_ready() -> Result<()> {
    if !capture_compiled() {
        return Err(Error::input_unavailable(
            "built without the input-hook feature; rebuild with `--features input-hook`",
        ));
    }

    #[cfg(target_os = "linux")]
    {
        let support = imp::capture_support();
        if !support.supported {
            return Err(Error::input_unavailable(support.message));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if imp::ensure_permission().is_err() {
            return Err(Error::permission_missing(
                "Accessibility",
                imp::get_permission_instructions(),
            ));
        }
    }

    Ok(())
}

/// The input monitor to record with.
///
/// # Errors
///
/// Returns the [`capture_ready`] error when capture cannot work here.
pub fn input_monitor() -> Result<Box<dyn InputMonitor>> {
    capture_ready()?;
    #[cfg(feature = "input-hook")]
    {
        Ok(Box::new(crate::hook::HookMonitor::new()))
    }
    #[cfg(not(feature = "input-hook"))]
    {
        Err(Error::internal("capture reported ready without the input hook"))
    }
}

/// One-line description of the capture environment for `status`.
#[must_use]
pub fn capture_details() -> String {
    #[cfg(target_os = "linux")]
    {
        format!(
            "{} ({})",
            imp::display_server(),
            imp::capture_support().message
        )
    }
    #[cfg(target_os = "macos")]
    {
        imp::check_permission().description
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        "no platform checks available".to_string()
    }
}

/// Snapshot of capture support for `status`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CaptureStatus {
    /// Built with the input hook.
    pub compiled: bool,
    /// Recording can start right now.
    pub ready: bool,
    /// Capture is blocked on an OS permission grant.
    pub permission_missing: bool,
    /// Why capture is not ready.
    pub error: Option<String>,
    /// Display server or permission details.
    pub details: String,
}

/// Collect the current [`CaptureStatus`].
#[must_use]
pub fn capture_status() -> CaptureStatus {
    let ready = capture_ready();
    CaptureStatus {
        compiled: capture_compiled(),
        ready: ready.is_ok(),
        permission_missing: ready.as_ref().is_err_and(Error::is_permission_error),
        error: ready.err().map(|e| e.to_string()),
        details: capture_details(),
    }
}

/// Screen size to map recordings onto.
///
/// The configured size is used unless detection is enabled and the input
/// hook reports a display size.
#[must_use]
pub fn screen_size(config: &ScreenConfig) -> (u32, u32) {
    if config.detect {
        if let Some(size) = detect_screen_size() {
            return size;
        }
    }
    (config.width, config.height)
}

#[cfg(feature = "input-hook")]
fn detect_screen_size() -> Option<(u32, u32)> {
    crate::hook::display_size()
}

#[cfg(not(feature = "input-hook"))]
fn detect_screen_size() -> Option<(u32, u32)> {
    None
}
