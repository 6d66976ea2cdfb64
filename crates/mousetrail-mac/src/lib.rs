//! macOS-specific implementation for mousetrail.
//!
//! Global mouse capture on macOS depends on privacy grants the user has to
//! approve in System Settings. This crate checks them and explains how to
//! grant them.

#![cfg(target_os = "macos")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod permissions;

pub use permissions::{
    check_permission, ensure_permission, get_permission_instructions, is_accessibility_enabled,
    request_accessibility_permission, PermissionError, PermissionStatus,
};

/// Initialize macOS-specific components.
///
/// # Errors
///
/// Returns an error if initialization fails.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Initializing macOS platform components");
    let status = check_permission();
    if !status.is_granted {
        tracing::debug!("{}", status.description);
    }
    Ok(())
}

/// Get the platform name.
#[must_use]
pub fn platform_name() -> &'static str {
    "macOS"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }

    #[test]
    fn test_platform_name() {
        assert_eq!(platform_name(), "macOS");
    }

    #[test]
    fn test_permission_exports() {
        let status = check_permission();
        assert!(!status.description.is_empty());
        assert!(!get_permission_instructions().is_empty());
    }
}
