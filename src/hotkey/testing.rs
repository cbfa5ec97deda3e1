//! In-memory hotkey service used by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use global_hotkey::hotkey::HotKey;
use tokio::sync::mpsc;

use crate::config::KeyBinding;
use crate::events::{HotkeyId, KeyDown};

use super::binding::ResolvedBinding;
use super::registry::{EventStream, HotkeyService};

pub fn binding(key: &str, modifiers: &[&str], app: &str) -> ResolvedBinding {
    ResolvedBinding::resolve(&KeyBinding {
        key: key.into(),
        app: app.into(),
        modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
    })
    .unwrap()
}

/// Rejects duplicate combinations the way the OS does
#[derive(Default)]
pub struct FakeHotkeyService {
    routes: Arc<Mutex<HashMap<HotkeyId, mpsc::UnboundedSender<KeyDown>>>>,
    pub fail_unregister: bool,
}

impl FakeHotkeyService {
    pub fn registered(&self) -> usize {
        self.routes.lock().unwrap().len()
    }

    /// Deliver a key-down for `id`; false if nothing is listening
    pub fn fire(&self, id: HotkeyId) -> bool {
        fire(&self.routes, id)
    }

    /// A clonable trigger that can be moved to other threads
    pub fn trigger(&self) -> Trigger {
        Trigger {
            routes: Arc::clone(&self.routes),
        }
    }
}

impl HotkeyService for FakeHotkeyService {
    fn register(&mut self, hotkey: HotKey) -> Result<EventStream, global_hotkey::Error> {
        let mut routes = self.routes.lock().unwrap();
        if routes.contains_key(&hotkey.id()) {
            return Err(global_hotkey::Error::AlreadyRegistered(hotkey));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        routes.insert(hotkey.id(), tx);
        Ok(rx)
    }

    fn unregister(&mut self, hotkey: HotKey) -> Result<(), global_hotkey::Error> {
        if self.fail_unregister {
            return Err(global_hotkey::Error::FailedToUnRegister(hotkey));
        }
        self.routes.lock().unwrap().remove(&hotkey.id());
        Ok(())
    }
}

#[derive(Clone)]
pub struct Trigger {
    routes: Arc<Mutex<HashMap<HotkeyId, mpsc::UnboundedSender<KeyDown>>>>,
}

impl Trigger {
    pub fn fire(&self, id: HotkeyId) -> bool {
        fire(&self.routes, id)
    }
}

fn fire(routes: &Mutex<HashMap<HotkeyId, mpsc::UnboundedSender<KeyDown>>>, id: HotkeyId) -> bool {
    routes
        .lock()
        .unwrap()
        .get(&id)
        .is_some_and(|tx| tx.send(KeyDown { id }).is_ok())
}
