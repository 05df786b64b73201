//! Listener capability: objects that subscribe a group of handlers at once.

use crate::events::{Event, EventError, EventHandler, TypedEventHandler};
use std::any::TypeId;
use std::sync::Arc;

/// An object able to receive host notifications through explicit registration.
///
/// When registered with [`EventSystem::register_listener`], the dispatcher asks
/// the listener to [`subscribe`](Listener::subscribe) its handlers. Every
/// handler added that way is owned by the resulting
/// [`ListenerId`](crate::ListenerId) and removed again by
/// [`EventSystem::unregister_listener`].
///
/// # Examples
///
/// ```rust
/// use match_event_system::*;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct RoundStarted;
///
/// struct Announcer;
///
/// impl Listener for Announcer {
///     fn listener_name(&self) -> &str { "announcer" }
///
///     fn subscribe(self: Arc<Self>, subscriptions: &mut Subscriptions) {
///         subscriptions.on(|_: &RoundStarted| Ok(()));
///     }
/// }
///
/// let events = create_match_event_system();
/// let id = events.register_listener(Arc::new(Announcer));
/// assert_eq!(events.emit(&RoundStarted), 1);
/// assert!(events.unregister_listener(id));
/// ```
///
/// [`EventSystem::register_listener`]: crate::EventSystem::register_listener
/// [`EventSystem::unregister_listener`]: crate::EventSystem::unregister_listener
pub trait Listener: Send + Sync {
    /// Name used in logs and handler names.
    fn listener_name(&self) -> &str;

    /// Adds this listener's handlers. Closures may capture a clone of `self`.
    fn subscribe(self: Arc<Self>, subscriptions: &mut Subscriptions);
}

/// Collects the handlers a [`Listener`] wants registered.
pub struct Subscriptions {
    owner: String,
    handlers: Vec<(TypeId, Arc<dyn EventHandler>)>,
}

impl Subscriptions {
    pub(crate) fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            handlers: Vec::new(),
        }
    }

    /// Subscribes a handler for events of type `E`.
    pub fn on<E, F>(&mut self, handler: F) -> &mut Self
    where
        E: Event,
        F: Fn(&E) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let name = format!("{}::{}", self.owner, E::type_name());
        let handler: Arc<dyn EventHandler> = Arc::new(TypedEventHandler::new(name, handler));
        self.handlers.push((TypeId::of::<E>(), handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn into_handlers(self) -> Vec<(TypeId, Arc<dyn EventHandler>)> {
        self.handlers
    }
}
