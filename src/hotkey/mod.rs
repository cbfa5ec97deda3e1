//! Hotkey module for global keyboard shortcut registration
//!
//! Resolves configured key and modifier names, owns the registered
//! hotkey handles and delivers key-down events per handle.

mod binding;
mod keys;
mod listener;
mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use binding::resolve_all;
pub use listener::GlobalHotkeyService;
pub use registry::{Registry, Subscription};
