//! Activation module: bringing a running application to the foreground

#[cfg(target_os = "macos")]
mod workspace;

use std::sync::Arc;

use crate::events::ActivationOutcome;

#[cfg(target_os = "macos")]
pub use workspace::WorkspaceActivator;

/// Brings applications forward by display name
///
/// Called concurrently from every dispatch task.
pub trait Activator: Send + Sync {
    /// Activate the first running application named exactly `app_name`
    ///
    /// Finding no such application is not an error.
    fn activate(&self, app_name: &str) -> ActivationOutcome;
}

/// Errors that can occur while setting up activation
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("application activation is not supported on this platform")]
    Unsupported,
}

/// The activator for the current platform
#[cfg(target_os = "macos")]
pub fn system_activator() -> Result<Arc<dyn Activator>, ActivationError> {
    Ok(Arc::new(WorkspaceActivator::new()))
}

/// The activator for the current platform
#[cfg(not(target_os = "macos"))]
pub fn system_activator() -> Result<Arc<dyn Activator>, ActivationError> {
    Err(ActivationError::Unsupported)
}
