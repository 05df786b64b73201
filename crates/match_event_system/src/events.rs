//! Event, handler and identifier types shared by the dispatcher and its listeners.

use std::any::{Any, TypeId};
use std::fmt;

/// Marker trait for anything that can be published through the [`EventSystem`].
///
/// Events are dispatched in-process by type, so they are never serialized and
/// may carry shared handles (for example an `Arc` to the match that produced
/// them). Any `'static` type that is `Send + Sync + Debug` is an event through
/// the blanket implementation below.
///
/// [`EventSystem`]: crate::EventSystem
pub trait Event: Any + Send + Sync + fmt::Debug {
    /// Returns a stable, human-readable name for this event type.
    fn type_name() -> &'static str
    where
        Self: Sized;
}

impl<T> Event for T
where
    T: Any + Send + Sync + fmt::Debug,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Type-erased handler invoked by the dispatcher.
///
/// Most code never implements this directly; handlers are registered as
/// closures through [`EventSystem::on`](crate::EventSystem::on) or
/// [`Subscriptions::on`](crate::Subscriptions::on) and wrapped in a
/// [`TypedEventHandler`].
pub trait EventHandler: Send + Sync {
    /// Handles one published event.
    fn handle(&self, event: &dyn Any) -> Result<(), EventError>;

    /// Returns the `TypeId` of the event type this handler expects.
    fn expected_type_id(&self) -> TypeId;

    /// Returns a human-readable name for this handler for debugging.
    fn handler_name(&self) -> &str;
}

/// Type-safe wrapper bridging a closure over `&T` to [`EventHandler`].
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&T) -> Result<(), EventError> + Send + Sync,
{
    handler: F,
    name: String,
    _phantom: std::marker::PhantomData<fn(&T)>,
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&T) -> Result<(), EventError> + Send + Sync,
{
    /// Creates a new typed event handler.
    pub fn new(name: String, handler: F) -> Self {
        Self {
            handler,
            name,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T, F> EventHandler for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&T) -> Result<(), EventError> + Send + Sync,
{
    fn handle(&self, event: &dyn Any) -> Result<(), EventError> {
        let event = event
            .downcast_ref::<T>()
            .ok_or_else(|| EventError::TypeMismatch {
                handler: self.name.clone(),
                expected: T::type_name(),
            })?;
        (self.handler)(event)
    }

    fn expected_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

/// Identifier returned when a standalone handler is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

/// Identifier returned when a [`Listener`](crate::Listener) is registered.
///
/// Revoking the registration removes every handler the listener subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Errors that can occur while dispatching events.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A handler received an event of a type it was not registered for
    #[error("Handler {handler} expected event type {expected}")]
    TypeMismatch {
        handler: String,
        expected: &'static str,
    },
    /// Handler execution failed during event processing
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
}
