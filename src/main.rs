//! focus: global hotkeys that bring macOS applications to the foreground
//!
//! Reads `~/.config/focus/config.toml`, registers one system-wide hotkey
//! per binding and activates the bound application whenever its hotkey
//! is pressed. Runs until SIGINT or SIGTERM.

mod activation;
mod config;
mod dispatch;
mod events;
mod hotkey;
mod lifecycle;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::dispatch::Dispatcher;
use crate::hotkey::{GlobalHotkeyService, Registry};
use crate::lifecycle::{MainLoop, ShutdownSignal};

/// How long dispatch tasks get to drain after their hotkeys are unregistered
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// The single place where a fatal error becomes an exit status
fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(ConfigError::NotFound { path }) = err.downcast_ref::<ConfigError>() {
        println!("{}", usage(path));
        return ExitCode::from(1);
    }

    error!(error = %format!("{err:#}"), "fatal error");
    eprintln!("focus: {err:#}");
    ExitCode::from(1)
}

/// Guidance printed when the configuration file does not exist
fn usage(path: &Path) -> String {
    format!(
        "Config file not found at {}.\n\
         To set up bindings, create a config file with the following format:\n{}",
        path.display(),
        config::EXAMPLE
    )
}

fn run() -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "focus starting");

    // Load configuration
    let config = Config::load()?;
    info!(bindings = config.bindings.len(), "configuration loaded");

    // Resolve every name before anything is registered
    let bindings = hotkey::resolve_all(&config.bindings)?;

    let activator = activation::system_activator()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("focus-worker")
        .build()
        .context("failed to start async runtime")?;

    // The OS hotkey manager lives on the main thread
    let service = GlobalHotkeyService::new()?;
    let mut registry = Registry::new(service, bindings);
    if registry.is_empty() {
        warn!("no bindings configured");
    }

    info!(count = registry.len(), "registering hotkeys");
    let subscriptions = registry.register_all()?;

    let mut dispatcher = Dispatcher::new(runtime.handle().clone(), activator);
    for subscription in subscriptions {
        dispatcher.spawn(subscription);
    }
    for handle in registry.handles() {
        info!(binding = %handle.binding(), id = handle.id(), "hotkey active");
    }
    info!(count = registry.active_count(), "hotkeys registered");

    let shutdown = {
        let _guard = runtime.enter();
        ShutdownSignal::install().context("failed to install signal handlers")?
    };

    let main_loop = MainLoop::new();
    let stopper = main_loop.handle();
    runtime.spawn(async move {
        shutdown.wait().await;
        info!("shutdown signal received");
        stopper.stop();
    });

    main_loop.run();

    info!("unregistering hotkeys");
    registry.unregister_all()?;
    info!("hotkeys unregistered");

    let tasks = dispatcher.len();
    let finished = runtime.block_on(dispatcher.shutdown(SHUTDOWN_GRACE));
    info!(finished, tasks, "dispatch tasks stopped");

    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    info!("focus stopped");

    Ok(())
}
