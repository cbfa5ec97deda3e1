//! Binding registry: one hotkey handle per resolved binding
//!
//! Handles move through a strictly linear lifecycle (inactive, active,
//! retired). Registration and unregistration go through a
//! [`HotkeyService`], which delivers key-down events for each active
//! handle on its own stream.

use global_hotkey::hotkey::HotKey;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::{HotkeyId, KeyDown};

use super::binding::ResolvedBinding;

/// Stream of key-down events for one registered hotkey
pub type EventStream = mpsc::UnboundedReceiver<KeyDown>;

/// System facility that intercepts key combinations
pub trait HotkeyService {
    /// Start intercepting `hotkey` system-wide
    fn register(&mut self, hotkey: HotKey) -> Result<EventStream, global_hotkey::Error>;

    /// Stop intercepting `hotkey` and close its event stream
    fn unregister(&mut self, hotkey: HotKey) -> Result<(), global_hotkey::Error>;
}

/// Errors that can occur while registering hotkeys
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("failed to create hotkey manager")]
    Manager(#[source] global_hotkey::Error),

    #[error("failed to spawn hotkey forwarder thread")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("failed to register hotkey {combo}")]
    Register {
        combo: String,
        #[source]
        source: global_hotkey::Error,
    },

    #[error("failed to unregister hotkey {combo}")]
    Unregister {
        combo: String,
        #[source]
        source: global_hotkey::Error,
    },

    #[error("hotkey {combo} has already been registered")]
    AlreadyRegistered { combo: String },

    #[error("hotkey {combo} is not registered")]
    NotRegistered { combo: String },
}

/// Lifecycle of a handle; never re-entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Inactive,
    Active,
    Retired,
}

/// What a dispatch task needs to serve one active hotkey
#[derive(Debug)]
pub struct Subscription {
    pub id: HotkeyId,
    pub combo: String,
    pub app: String,
    pub events: EventStream,
}

/// One platform hotkey plus the application it brings forward
#[derive(Debug)]
pub struct HotkeyHandle {
    binding: ResolvedBinding,
    hotkey: HotKey,
    state: HandleState,
}

impl HotkeyHandle {
    pub fn new(binding: ResolvedBinding) -> Self {
        let hotkey = binding.hotkey();
        Self {
            binding,
            hotkey,
            state: HandleState::Inactive,
        }
    }

    pub fn binding(&self) -> &ResolvedBinding {
        &self.binding
    }

    pub fn id(&self) -> HotkeyId {
        self.hotkey.id()
    }

    pub fn is_active(&self) -> bool {
        self.state == HandleState::Active
    }

    /// Ask the service to start delivering events for this handle
    pub fn register<S>(&mut self, service: &mut S) -> Result<Subscription, HotkeyError>
    where
        S: HotkeyService + ?Sized,
    {
        if self.state != HandleState::Inactive {
            return Err(HotkeyError::AlreadyRegistered {
                combo: self.binding.combo.clone(),
            });
        }

        let events = service
            .register(self.hotkey)
            .map_err(|source| HotkeyError::Register {
                combo: self.binding.combo.clone(),
                source,
            })?;
        self.state = HandleState::Active;

        debug!(combo = %self.binding.combo, id = self.id(), "hotkey registered");

        Ok(Subscription {
            id: self.id(),
            combo: self.binding.combo.clone(),
            app: self.binding.app.clone(),
            events,
        })
    }

    /// Stop delivering events; the handle is inert afterwards
    pub fn unregister<S>(&mut self, service: &mut S) -> Result<(), HotkeyError>
    where
        S: HotkeyService + ?Sized,
    {
        if self.state != HandleState::Active {
            return Err(HotkeyError::NotRegistered {
                combo: self.binding.combo.clone(),
            });
        }

        service
            .unregister(self.hotkey)
            .map_err(|source| HotkeyError::Unregister {
                combo: self.binding.combo.clone(),
                source,
            })?;
        self.state = HandleState::Retired;

        debug!(combo = %self.binding.combo, id = self.id(), "hotkey unregistered");
        Ok(())
    }
}

/// Owns every handle for the lifetime of the process
pub struct Registry<S> {
    service: S,
    handles: Vec<HotkeyHandle>,
}

impl<S: HotkeyService> Registry<S> {
    /// Build one handle per binding, in input order
    pub fn new(service: S, bindings: Vec<ResolvedBinding>) -> Self {
        Self {
            service,
            handles: bindings.into_iter().map(HotkeyHandle::new).collect(),
        }
    }

    pub fn handles(&self) -> &[HotkeyHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_active()).count()
    }

    /// Register every handle in order
    ///
    /// Stops at the first failure. Handles registered earlier in this call
    /// are unregistered again before the error is returned.
    pub fn register_all(&mut self) -> Result<Vec<Subscription>, HotkeyError> {
        let mut subscriptions = Vec::with_capacity(self.handles.len());

        for index in 0..self.handles.len() {
            match self.handles[index].register(&mut self.service) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(e) => {
                    self.roll_back(index);
                    return Err(e);
                }
            }
        }

        Ok(subscriptions)
    }

    /// Unregister every active handle in order, stopping at the first failure
    pub fn unregister_all(&mut self) -> Result<(), HotkeyError> {
        for handle in self.handles.iter_mut().filter(|h| h.is_active()) {
            handle.unregister(&mut self.service)?;
        }
        Ok(())
    }

    fn roll_back(&mut self, failed: usize) {
        if failed == 0 {
            return;
        }

        info!(count = failed, "unregistering hotkeys after failed registration");
        for handle in self.handles[..failed].iter_mut().filter(|h| h.is_active()) {
            if let Err(e) = handle.unregister(&mut self.service) {
                warn!(?e, combo = %handle.binding().combo, "failed to roll back hotkey");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::testing::{binding, FakeHotkeyService};

    fn registry(bindings: &[(&str, &[&str], &str)]) -> Registry<FakeHotkeyService> {
        let resolved = bindings
            .iter()
            .map(|(key, mods, app)| binding(key, mods, app))
            .collect();
        Registry::new(FakeHotkeyService::default(), resolved)
    }

    #[test]
    fn test_one_handle_per_binding_in_order() {
        let registry = registry(&[("1", &["cmd"], "Cursor"), ("2", &["cmd"], "Safari")]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.handles()[0].binding().app, "Cursor");
        assert_eq!(registry.handles()[1].binding().app, "Safari");
    }

    #[test]
    fn test_register_and_unregister_all() {
        let mut registry = registry(&[
            ("1", &["cmd"], "Cursor"),
            ("2", &["cmd"], "Safari"),
            ("t", &["ctrl", "alt"], "Terminal"),
        ]);

        let mut subscriptions = registry.register_all().unwrap();
        assert_eq!(subscriptions.len(), 3);
        assert_eq!(registry.active_count(), 3);
        assert_eq!(registry.service.registered(), 3);
        assert_eq!(subscriptions[2].app, "Terminal");
        assert_eq!(subscriptions[2].combo, "ctrl+alt+t");

        registry.unregister_all().unwrap();
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.service.registered(), 0);

        for subscription in &mut subscriptions {
            assert!(subscription.events.try_recv().is_err());
            assert!(subscription.events.is_closed());
        }
    }

    #[test]
    fn test_handles_unregister_independently() {
        let mut registry = registry(&[("1", &["cmd"], "Cursor"), ("2", &["cmd"], "Safari")]);
        let mut subscriptions = registry.register_all().unwrap();

        let Registry { service, handles } = &mut registry;
        handles[0].unregister(service).unwrap();

        assert!(!service.fire(subscriptions[0].id));
        assert!(service.fire(subscriptions[1].id));
        assert!(subscriptions[0].events.is_closed());
        assert_eq!(
            subscriptions[1].events.try_recv().unwrap(),
            KeyDown { id: subscriptions[1].id }
        );
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_duplicate_combination_fails_and_rolls_back() {
        let mut registry = registry(&[
            ("1", &["cmd"], "Cursor"),
            ("2", &["cmd"], "Safari"),
            ("1", &["command"], "Terminal"),
        ]);

        let err = registry.register_all().unwrap_err();
        assert!(matches!(&err, HotkeyError::Register { combo, .. } if combo == "command+1"));
        assert!(matches!(
            err,
            HotkeyError::Register {
                source: global_hotkey::Error::AlreadyRegistered(_),
                ..
            }
        ));
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.service.registered(), 0);
    }

    #[test]
    fn test_lifecycle_is_linear() {
        let mut service = FakeHotkeyService::default();
        let mut handle = HotkeyHandle::new(binding("1", &["cmd"], "Cursor"));

        assert!(matches!(
            handle.unregister(&mut service),
            Err(HotkeyError::NotRegistered { .. })
        ));

        handle.register(&mut service).unwrap();
        assert!(matches!(
            handle.register(&mut service),
            Err(HotkeyError::AlreadyRegistered { .. })
        ));

        handle.unregister(&mut service).unwrap();
        assert!(matches!(
            handle.register(&mut service),
            Err(HotkeyError::AlreadyRegistered { .. })
        ));
        assert!(matches!(
            handle.unregister(&mut service),
            Err(HotkeyError::NotRegistered { .. })
        ));
    }

    #[test]
    fn test_unregister_failure_is_reported() {
        let mut registry = registry(&[("1", &["cmd"], "Cursor")]);
        registry.register_all().unwrap();
        registry.service.fail_unregister = true;

        let err = registry.unregister_all().unwrap_err();
        assert!(matches!(err, HotkeyError::Unregister { combo, .. } if combo == "cmd+1"));
    }
}
