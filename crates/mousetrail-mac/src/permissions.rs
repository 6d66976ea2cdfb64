//! Permission handling for macOS input capture.
//!
//! A global mouse hook on macOS is an event tap, which the system only
//! delivers to processes trusted for Accessibility (and, on Catalina and
//! later, Input Monitoring). Without the grant the tap is created but
//! silently receives nothing, so recording is refused up front.

use macos_accessibility_client::accessibility;
use thiserror::Error;

/// Errors related to input capture permissions.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// Accessibility permission is not granted.
    #[error("accessibility permission not granted")]
    NotGranted,

    /// Failed to check permissions.
    #[error("failed to check accessibility permissions: {0}")]
    CheckFailed(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermissionError>;

/// Information about the current permission status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionStatus {
    /// Whether the process is trusted for accessibility.
    pub is_granted: bool,

    /// Human-readable description of the status.
    pub description: String,
}

impl PermissionStatus {
    /// Create a new granted status.
    #[must_use]
    pub fn granted() -> Self {
        Self {
            is_granted: true,
            description: "Accessibility permission is granted".to_string(),
        }
    }

    /// Create a new not-granted status.
    #[must_use]
    pub fn not_granted() -> Self {
        Self {
            is_granted: false,
            description: "Accessibility permission is not granted; mouse events will not be delivered"
                .to_string(),
        }
    }
}

/// Check if the process is trusted for accessibility.
#[must_use]
pub fn is_accessibility_enabled() -> bool {
    accessibility::application_is_trusted()
}

/// Check permission status.
#[must_use]
pub fn check_permission() -> PermissionStatus {
    if is_accessibility_enabled() {
        PermissionStatus::granted()
    } else {
        PermissionStatus::not_granted()
    }
}

/// Require the accessibility grant before starting a recording.
///
/// # Errors
///
/// Returns [`PermissionError::NotGranted`] when the process is not trusted.
pub fn ensure_permission() -> Result<()> {
    if is_accessibility_enabled() {
        Ok(())
    } else {
        tracing::warn!("Accessibility permission missing; recording would capture nothing");
        Err(PermissionError::NotGranted)
    }
}

/// Prompt the user to grant accessibility permissions.
///
/// Opens the system prompt that links to Privacy & Security > Accessibility.
/// The user still has to flip the switch.
#[must_use]
pub fn request_accessibility_permission() -> bool {
    accessibility::application_is_trusted_with_prompt()
}

/// Get instructions for how to grant the permissions recording needs.
#[must_use]
pub fn get_permission_instructions() -> &'static str {
    r"To allow mouse recording:

1. Open System Settings (System Preferences before Ventura)
2. Go to Privacy & Security > Accessibility
3. Enable the terminal application you run 'mousetrail' from
   (or 'mousetrail' itself, using the '+' button if it is not listed)
4. Repeat step 3 under Privacy & Security > Input Monitoring

Restart the terminal after granting access so the new permission applies."
}
