//! Binding of listener-capable modules to the host dispatcher.

use crate::module::{instance_key, MatchModule};
use match_event_system::{EventSystem, ListenerId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

struct Binding {
    key: usize,
    module: String,
    listener: ListenerId,
}

/// Tracks which modules of a match are registered with the event system.
///
/// The registry guarantees each module instance appears once, so each
/// listener-capable module is bound once per load. Unbinding revokes its
/// registration and forgets it.
pub struct ListenerBinder {
    events: Arc<EventSystem>,
    bindings: Mutex<Vec<Binding>>,
}

impl ListenerBinder {
    pub fn new(events: Arc<EventSystem>) -> Self {
        Self {
            events,
            bindings: Mutex::new(Vec::new()),
        }
    }

    /// Registers the module with the dispatcher if it has the listener
    /// capability.
    pub fn bind(&self, module: &Arc<dyn MatchModule>) -> Option<ListenerId> {
        let listener = module.clone().as_listener()?;
        let id = self.events.register_listener(listener);
        self.bindings.lock().push(Binding {
            key: instance_key(module),
            module: module.name().to_string(),
            listener: id,
        });
        debug!("Bound module {} as {}", module.name(), id);
        Some(id)
    }

    /// Revokes the module's registration. Returns `false` if it was not bound.
    pub fn unbind(&self, module: &Arc<dyn MatchModule>) -> bool {
        let key = instance_key(module);
        let binding = {
            let mut bindings = self.bindings.lock();
            match bindings.iter().position(|binding| binding.key == key) {
                Some(index) => bindings.remove(index),
                None => return false,
            }
        };

        self.events.unregister_listener(binding.listener);
        debug!("Unbound module {} ({})", binding.module, binding.listener);
        true
    }

    /// Revokes every remaining registration; returns how many were revoked.
    pub fn unbind_all(&self) -> usize {
        let bindings: Vec<Binding> = self.bindings.lock().drain(..).collect();
        for binding in &bindings {
            self.events.unregister_listener(binding.listener);
            debug!("Unbound module {} ({})", binding.module, binding.listener);
        }
        bindings.len()
    }

    pub fn is_bound(&self, module: &Arc<dyn MatchModule>) -> bool {
        let key = instance_key(module);
        self.bindings.lock().iter().any(|binding| binding.key == key)
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.lock().len()
    }

    /// Names of the bound modules, in binding order.
    pub fn bound_modules(&self) -> Vec<String> {
        self.bindings
            .lock()
            .iter()
            .map(|binding| binding.module.clone())
            .collect()
    }
}

impl std::fmt::Debug for ListenerBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerBinder")
            .field("bound", &self.bound_modules())
            .finish()
    }
}
