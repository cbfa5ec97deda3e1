//! System hotkey service backed by the `global-hotkey` crate
//!
//! The crate reports every hotkey on one global channel. A dedicated
//! forwarder thread drains that channel and routes each key-down to the
//! event stream of the hotkey it belongs to.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyEventReceiver, GlobalHotKeyManager, HotKeyState,
};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::events::{HotkeyId, KeyDown};

use super::registry::{EventStream, HotkeyError, HotkeyService};

/// How long the forwarder waits for an event before re-checking its flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Routes = Arc<Mutex<HashMap<HotkeyId, mpsc::UnboundedSender<KeyDown>>>>;

/// Production [`HotkeyService`]
///
/// Must be created on the main thread; on macOS the main thread also has
/// to run its event loop for key presses to be delivered.
pub struct GlobalHotkeyService {
    manager: GlobalHotKeyManager,
    routes: Routes,
    running: Arc<AtomicBool>,
    forwarder: Option<JoinHandle<()>>,
}

impl GlobalHotkeyService {
    /// Create the OS hotkey manager and start the forwarder thread
    pub fn new() -> Result<Self, HotkeyError> {
        let manager = GlobalHotKeyManager::new().map_err(HotkeyError::Manager)?;
        let routes: Routes = Arc::new(Mutex::new(HashMap::new()));
        let running = Arc::new(AtomicBool::new(true));

        let forwarder = {
            let routes = Arc::clone(&routes);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("hotkey-forwarder".to_string())
                .spawn(move || {
                    debug!("hotkey forwarder thread started");
                    forward_events(GlobalHotKeyEvent::receiver(), &routes, &running);
                    debug!("hotkey forwarder thread stopped");
                })
                .map_err(HotkeyError::ThreadSpawn)?
        };

        info!("hotkey manager created");

        Ok(Self {
            manager,
            routes,
            running,
            forwarder: Some(forwarder),
        })
    }
}

impl HotkeyService for GlobalHotkeyService {
    fn register(&mut self, hotkey: HotKey) -> Result<EventStream, global_hotkey::Error> {
        self.manager.register(hotkey)?;

        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.routes).insert(hotkey.id(), tx);
        Ok(rx)
    }

    fn unregister(&mut self, hotkey: HotKey) -> Result<(), global_hotkey::Error> {
        self.manager.unregister(hotkey)?;

        // Dropping the sender closes the stream
        lock(&self.routes).remove(&hotkey.id());
        Ok(())
    }
}

impl Drop for GlobalHotkeyService {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        lock(&self.routes).clear();

        if let Some(forwarder) = self.forwarder.take() {
            if forwarder.join().is_err() {
                warn!("hotkey forwarder thread panicked");
            }
        }
    }
}

fn lock(routes: &Routes) -> MutexGuard<'_, HashMap<HotkeyId, mpsc::UnboundedSender<KeyDown>>> {
    routes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drain `receiver` until `running` is cleared
fn forward_events(receiver: &GlobalHotKeyEventReceiver, routes: &Routes, running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        let Ok(event) = receiver.recv_timeout(POLL_INTERVAL) else {
            continue;
        };

        if event.state != HotKeyState::Pressed {
            trace!(id = event.id, "ignoring key release");
            continue;
        }

        match lock(routes).get(&event.id) {
            Some(tx) => {
                if tx.send(KeyDown { id: event.id }).is_err() {
                    debug!(id = event.id, "event stream closed, dropping key-down");
                }
            }
            None => trace!(id = event.id, "key-down for unknown hotkey"),
        }
    }
}
