//! Key and modifier name tables
//!
//! Maps the case-insensitive names accepted in the configuration to the
//! platform identifiers understood by the hotkey service.

use global_hotkey::hotkey::{Code, Modifiers};

/// Supported key names, in the order they are listed to the user
const KEYS: &[(&str, Code)] = &[
    // Digits
    ("0", Code::Digit0),
    ("1", Code::Digit1),
    ("2", Code::Digit2),
    ("3", Code::Digit3),
    ("4", Code::Digit4),
    ("5", Code::Digit5),
    ("6", Code::Digit6),
    ("7", Code::Digit7),
    ("8", Code::Digit8),
    ("9", Code::Digit9),
    // Letters
    ("a", Code::KeyA),
    ("b", Code::KeyB),
    ("c", Code::KeyC),
    ("d", Code::KeyD),
    ("e", Code::KeyE),
    ("f", Code::KeyF),
    ("g", Code::KeyG),
    ("h", Code::KeyH),
    ("i", Code::KeyI),
    ("j", Code::KeyJ),
    ("k", Code::KeyK),
    ("l", Code::KeyL),
    ("m", Code::KeyM),
    ("n", Code::KeyN),
    ("o", Code::KeyO),
    ("p", Code::KeyP),
    ("q", Code::KeyQ),
    ("r", Code::KeyR),
    ("s", Code::KeyS),
    ("t", Code::KeyT),
    ("u", Code::KeyU),
    ("v", Code::KeyV),
    ("w", Code::KeyW),
    ("x", Code::KeyX),
    ("y", Code::KeyY),
    ("z", Code::KeyZ),
    // Function keys
    ("f1", Code::F1),
    ("f2", Code::F2),
    ("f3", Code::F3),
    ("f4", Code::F4),
    ("f5", Code::F5),
    ("f6", Code::F6),
    ("f7", Code::F7),
    ("f8", Code::F8),
    ("f9", Code::F9),
    ("f10", Code::F10),
    ("f11", Code::F11),
    ("f12", Code::F12),
    // Named keys
    ("tab", Code::Tab),
    ("space", Code::Space),
    ("return", Code::Enter),
];

/// Supported modifier names, aliases included
const MODIFIERS: &[(&str, Modifiers)] = &[
    ("cmd", Modifiers::SUPER),
    ("command", Modifiers::SUPER),
    ("ctrl", Modifiers::CONTROL),
    ("control", Modifiers::CONTROL),
    ("alt", Modifiers::ALT),
    ("option", Modifiers::ALT),
    ("shift", Modifiers::SHIFT),
];

/// Errors raised when a configured name has no platform equivalent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unsupported key {key:?}\nvalid keys are: {}", .valid.join(", "))]
    UnsupportedKey {
        key: String,
        valid: Vec<&'static str>,
    },

    #[error("unsupported modifier {modifier:?}\nvalid modifiers are: {}", .valid.join(", "))]
    UnsupportedModifier {
        modifier: String,
        valid: Vec<&'static str>,
    },
}

/// All key names accepted by [`resolve_key`]
pub fn key_names() -> Vec<&'static str> {
    KEYS.iter().map(|(name, _)| *name).collect()
}

/// All modifier names accepted by [`resolve_modifier`]
pub fn modifier_names() -> Vec<&'static str> {
    MODIFIERS.iter().map(|(name, _)| *name).collect()
}

/// Resolve a key name to its platform key code
pub fn resolve_key(name: &str) -> Result<Code, ResolveError> {
    let folded = name.to_lowercase();
    KEYS.iter()
        .find(|(candidate, _)| *candidate == folded)
        .map(|(_, code)| *code)
        .ok_or_else(|| ResolveError::UnsupportedKey {
            key: name.to_owned(),
            valid: key_names(),
        })
}

/// Resolve a modifier name (or alias) to its platform modifier flag
pub fn resolve_modifier(name: &str) -> Result<Modifiers, ResolveError> {
    let folded = name.to_lowercase();
    MODIFIERS
        .iter()
        .find(|(candidate, _)| *candidate == folded)
        .map(|(_, modifier)| *modifier)
        .ok_or_else(|| ResolveError::UnsupportedModifier {
            modifier: name.to_owned(),
            valid: modifier_names(),
        })
}
