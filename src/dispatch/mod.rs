//! Dispatch module: one listener task per registered hotkey

mod dispatcher;

pub use dispatcher::Dispatcher;
