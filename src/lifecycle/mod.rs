//! Process lifecycle: shutdown signals and the main thread loop

mod main_loop;
mod shutdown;

pub use main_loop::MainLoop;
pub use shutdown::ShutdownSignal;
