//! Core EventSystem implementation

use crate::events::{Event, EventError, EventHandler, HandlerId, ListenerId, TypedEventHandler};
use crate::listener::{Listener, Subscriptions};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A handler as stored by the dispatcher, tagged with its owning listener.
struct RegisteredHandler {
    id: HandlerId,
    owner: Option<ListenerId>,
    handler: Arc<dyn EventHandler>,
}

/// The host-level notification dispatcher.
///
/// Handlers are keyed by the concrete event type. The dispatcher is an
/// ordinary value owned by the host runtime and injected wherever it is
/// needed; there is no global instance.
///
/// # Dispatch semantics
///
/// - Handlers for one event type run in registration order, synchronously,
///   on the publishing thread
/// - A failing handler is logged and counted; the remaining handlers still run
/// - Handlers may register or revoke other handlers while being dispatched;
///   the change takes effect from the next publish
pub struct EventSystem {
    /// Map of event types to their registered handlers
    handlers: DashMap<TypeId, Vec<RegisteredHandler>>,
    /// Registered listeners and their names
    listeners: DashMap<ListenerId, String>,
    /// Source for handler and listener identifiers
    next_id: AtomicU64,
    events_emitted: AtomicU64,
    handler_failures: AtomicU64,
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("handlers", &"[handlers]")
            .field("listeners", &self.listeners.len())
            .field("events_emitted", &self.events_emitted.load(Ordering::Relaxed))
            .finish()
    }
}

impl EventSystem {
    /// Creates a new event system with no registered handlers.
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            listeners: DashMap::new(),
            next_id: AtomicU64::new(1),
            events_emitted: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Registers a standalone handler for events of type `E`.
    ///
    /// Privileged host systems use this to react to notifications without
    /// being a listener themselves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use match_event_system::*;
    ///
    /// #[derive(Debug)]
    /// struct ServerStarted { port: u16 }
    ///
    /// let events = create_match_event_system();
    /// let id = events.on(|event: &ServerStarted| {
    ///     println!("listening on {}", event.port);
    ///     Ok(())
    /// });
    /// events.emit(&ServerStarted { port: 8080 });
    /// events.off(id);
    /// ```
    pub fn on<E, F>(&self, handler: F) -> HandlerId
    where
        E: Event,
        F: Fn(&E) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_id());
        let name = format!("{}::{}", id, E::type_name());
        let handler: Arc<dyn EventHandler> = Arc::new(TypedEventHandler::new(name, handler));
        self.insert(TypeId::of::<E>(), id, None, handler);

        debug!("📝 Registered {} for {}", id, E::type_name());
        id
    }

    /// Removes a standalone handler. Returns `false` if it was not registered.
    pub fn off(&self, id: HandlerId) -> bool {
        let mut removed = false;
        for mut entry in self.handlers.iter_mut() {
            let before = entry.len();
            entry.retain(|registered| registered.id != id);
            removed |= entry.len() != before;
        }
        if !removed {
            warn!("⚠️ Attempted to remove unknown {}", id);
        }
        removed
    }

    fn insert(
        &self,
        type_id: TypeId,
        id: HandlerId,
        owner: Option<ListenerId>,
        handler: Arc<dyn EventHandler>,
    ) {
        self.handlers
            .entry(type_id)
            .or_default()
            .push(RegisteredHandler { id, owner, handler });
    }

    /// Registers every handler a listener subscribes and returns the id that
    /// owns them.
    pub fn register_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id());
        let name = listener.listener_name().to_string();

        let mut subscriptions = Subscriptions::new(&name);
        listener.subscribe(&mut subscriptions);
        let handler_count = subscriptions.len();

        for (type_id, handler) in subscriptions.into_handlers() {
            let handler_id = HandlerId(self.next_id());
            self.insert(type_id, handler_id, Some(id), handler);
        }
        self.listeners.insert(id, name.clone());

        info!(
            "📝 Registered listener {} as {} ({} handlers)",
            name, id, handler_count
        );
        id
    }

    /// Revokes a listener and every handler it subscribed.
    ///
    /// Returns `false` if the listener was not registered, which makes a
    /// second revocation of the same id a no-op.
    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        let Some((_, name)) = self.listeners.remove(&id) else {
            warn!("⚠️ Attempted to unregister unknown {}", id);
            return false;
        };

        let mut removed = 0;
        for mut entry in self.handlers.iter_mut() {
            let before = entry.len();
            entry.retain(|registered| registered.owner != Some(id));
            removed += before - entry.len();
        }

        info!("🗑️ Unregistered listener {} ({} handlers)", name, removed);
        true
    }

    /// Returns `true` while the listener is registered.
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Publishes an event to every handler registered for its type.
    ///
    /// Returns the number of handlers invoked. Individual handler failures are
    /// logged and counted in the statistics but never stop dispatch.
    pub fn emit<E>(&self, event: &E) -> usize
    where
        E: Event,
    {
        let snapshot: Vec<Arc<dyn EventHandler>> = match self.handlers.get(&TypeId::of::<E>()) {
            Some(entry) => entry.iter().map(|r| r.handler.clone()).collect(),
            None => Vec::new(),
        };
        self.events_emitted.fetch_add(1, Ordering::Relaxed);

        if snapshot.is_empty() {
            debug!("No handlers for event: {}", E::type_name());
            return 0;
        }

        debug!(
            "📤 Emitting {} to {} handlers",
            E::type_name(),
            snapshot.len()
        );

        let payload: &dyn Any = event;
        for handler in &snapshot {
            if let Err(e) = handler.handle(payload) {
                self.handler_failures.fetch_add(1, Ordering::Relaxed);
                error!("❌ Handler {} failed: {}", handler.handler_name(), e);
            }
        }

        snapshot.len()
    }

    /// Returns current system statistics.
    pub fn get_stats(&self) -> EventSystemStats {
        EventSystemStats {
            total_handlers: self.handlers.iter().map(|entry| entry.len()).sum(),
            total_listeners: self.listeners.len(),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the event system's current state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventSystemStats {
    /// Total number of registered event handlers
    pub total_handlers: usize,
    /// Number of registered listeners
    pub total_listeners: usize,
    /// Total number of events published since creation
    pub events_emitted: u64,
    /// Handler invocations that returned an error
    pub handler_failures: u64,
}
