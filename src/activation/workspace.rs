//! macOS activation through NSWorkspace

use objc2::rc::autoreleasepool;
use objc2_app_kit::{NSApplicationActivationOptions, NSWorkspace};
use tracing::trace;

use crate::events::ActivationOutcome;

use super::Activator;

/// Scans `NSWorkspace.runningApplications` for an exact name match
#[derive(Debug, Default)]
pub struct WorkspaceActivator;

impl WorkspaceActivator {
    pub fn new() -> Self {
        Self
    }
}

impl Activator for WorkspaceActivator {
    fn activate(&self, app_name: &str) -> ActivationOutcome {
        autoreleasepool(|_| {
            let workspace = NSWorkspace::sharedWorkspace();

            for app in workspace.runningApplications().iter() {
                let Some(name) = app.localizedName() else {
                    continue;
                };
                if name.to_string() != app_name {
                    continue;
                }

                trace!(pid = app.processIdentifier(), %app_name, "activating application");
                #[allow(deprecated)]
                let activated =
                    app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps);
                return if activated {
                    ActivationOutcome::Activated
                } else {
                    ActivationOutcome::Refused
                };
            }

            ActivationOutcome::NotRunning
        })
    }
}
