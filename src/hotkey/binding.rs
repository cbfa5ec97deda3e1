//! Resolution of configured bindings into platform hotkeys

use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use crate::config::KeyBinding;

use super::keys::{resolve_key, resolve_modifier, ResolveError};

/// A binding whose names have been mapped to platform identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    /// Platform key code
    pub code: Code,
    /// Union of the platform modifier flags
    pub modifiers: Modifiers,
    /// Display name of the application to activate
    pub app: String,
    /// Human-readable combination, e.g. "cmd+shift+1"
    pub combo: String,
}

impl ResolvedBinding {
    /// Resolve the key first, then each modifier in order
    pub fn resolve(binding: &KeyBinding) -> Result<Self, ResolveError> {
        let code = resolve_key(&binding.key)?;

        let mut modifiers = Modifiers::empty();
        let mut parts = Vec::with_capacity(binding.modifiers.len() + 1);
        for name in &binding.modifiers {
            modifiers |= resolve_modifier(name)?;
            parts.push(name.to_lowercase());
        }
        parts.push(binding.key.to_lowercase());

        Ok(Self {
            code,
            modifiers,
            app: binding.app.clone(),
            combo: parts.join("+"),
        })
    }

    /// The platform hotkey for this binding
    pub fn hotkey(&self) -> HotKey {
        let modifiers = (!self.modifiers.is_empty()).then_some(self.modifiers);
        HotKey::new(modifiers, self.code)
    }
}

impl std::fmt::Display for ResolvedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.combo, self.app)
    }
}

/// Resolve every binding in order, stopping at the first invalid name
pub fn resolve_all(bindings: &[KeyBinding]) -> Result<Vec<ResolvedBinding>, ResolveError> {
    bindings.iter().map(ResolvedBinding::resolve).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(key: &str, modifiers: &[&str], app: &str) -> KeyBinding {
        KeyBinding {
            key: key.into(),
            app: app.into(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolve_binding() {
        let resolved = ResolvedBinding::resolve(&binding("1", &["Cmd", "shift"], "Cursor")).unwrap();
        assert_eq!(resolved.code, Code::Digit1);
        assert_eq!(resolved.modifiers, Modifiers::SUPER | Modifiers::SHIFT);
        assert_eq!(resolved.app, "Cursor");
        assert_eq!(resolved.combo, "cmd+shift+1");
        assert_eq!(resolved.to_string(), "cmd+shift+1 -> Cursor");
    }

    #[test]
    fn test_aliases_produce_same_hotkey() {
        let a = ResolvedBinding::resolve(&binding("k", &["cmd", "alt"], "Mail")).unwrap();
        let b = ResolvedBinding::resolve(&binding("K", &["command", "option"], "Mail")).unwrap();
        assert_eq!(a.hotkey(), b.hotkey());
        assert_eq!(a.hotkey().id(), b.hotkey().id());
    }

    #[test]
    fn test_no_modifiers() {
        let resolved = ResolvedBinding::resolve(&binding("f5", &[], "Notes")).unwrap();
        assert!(resolved.modifiers.is_empty());
        assert_eq!(resolved.combo, "f5");
    }

    #[test]
    fn test_key_checked_before_modifiers() {
        let err = ResolvedBinding::resolve(&binding("esc", &["hyper"], "Mail")).unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedKey { key, .. } if key == "esc"));
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let resolved = resolve_all(&[
            binding("1", &["cmd"], "Cursor"),
            binding("2", &["cmd"], "Safari"),
        ])
        .unwrap();
        let apps: Vec<_> = resolved.iter().map(|r| r.app.as_str()).collect();
        assert_eq!(apps, ["Cursor", "Safari"]);
    }

    #[test]
    fn test_resolve_all_stops_at_first_error() {
        let err = resolve_all(&[
            binding("1", &["cmd"], "Cursor"),
            binding("2", &["super"], "Safari"),
            binding("nope", &[], "Mail"),
        ])
        .unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedModifier { modifier, .. } if modifier == "super"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let resolved = resolve_all(&[
            binding("1", &["cmd"], "Cursor"),
            binding("1", &["command"], "Safari"),
        ])
        .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].hotkey(), resolved[1].hotkey());
    }
}
