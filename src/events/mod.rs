//! Events flowing from the hotkey service to the dispatch loop
//!
//! Provides the key-down notification delivered per registered hotkey
//! and the outcome reported by an activation attempt.

/// Identifier the hotkey service assigns to a registered combination
pub type HotkeyId = u32;

/// A single key-down notification for one registered hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDown {
    /// Hotkey that was pressed
    pub id: HotkeyId,
}

/// Result of asking the system to bring an application forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// A running application matched and was activated
    Activated,

    /// No running application has the requested name
    NotRunning,

    /// An application matched but the system declined to activate it
    Refused,
}

impl std::fmt::Display for ActivationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivationOutcome::Activated => write!(f, "activated"),
            ActivationOutcome::NotRunning => write!(f, "not running"),
            ActivationOutcome::Refused => write!(f, "refused"),
        }
    }
}
