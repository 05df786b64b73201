//! # Match Event System
//!
//! A small, type-safe publish/subscribe dispatcher used by the match host and
//! by gameplay modules. Notifications are keyed by their Rust type and
//! delivered synchronously on the publishing thread.
//!
//! ## Core Features
//!
//! - **Type Safety**: handlers receive `&E` for exactly the event type they
//!   registered for
//! - **Injectable**: an [`EventSystem`] is a plain value owned by the host; there
//!   is no process-wide handler list
//! - **Listener Registration**: objects implementing [`Listener`] subscribe a
//!   group of handlers that can be revoked together
//! - **Handler Isolation**: one failing handler does not prevent the others
//!   from running
//! - **Statistics**: handler, listener, emission and failure counters
//!
//! ## Quick Start Example
//!
//! ```rust
//! use match_event_system::*;
//!
//! #[derive(Debug)]
//! struct PlayerJoined { name: String }
//!
//! let events = create_match_event_system();
//!
//! events.on(|event: &PlayerJoined| {
//!     println!("{} joined", event.name);
//!     Ok(())
//! });
//!
//! let notified = events.emit(&PlayerJoined { name: "alice".to_string() });
//! assert_eq!(notified, 1);
//! ```

mod events;
mod listener;
mod system;

pub use events::{Event, EventError, EventHandler, HandlerId, ListenerId, TypedEventHandler};
pub use listener::{Listener, Subscriptions};
pub use system::{EventSystem, EventSystemStats};

use std::sync::Arc;

/// Creates a new event system instance ready to be shared with a match.
pub fn create_match_event_system() -> Arc<EventSystem> {
    Arc::new(EventSystem::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct TestEvent {
        message: String,
    }

    #[derive(Debug)]
    struct OtherEvent;

    /// Listener that counts every TestEvent it receives.
    struct CountingListener {
        received: AtomicUsize,
    }

    impl Listener for CountingListener {
        fn listener_name(&self) -> &str {
            "counting_listener"
        }

        fn subscribe(self: Arc<Self>, subscriptions: &mut Subscriptions) {
            let this = self.clone();
            subscriptions.on(move |_: &TestEvent| {
                this.received.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            subscriptions.on(|_: &OtherEvent| Ok(()));
        }
    }

    #[test]
    fn test_typed_dispatch_only_reaches_matching_type() {
        let events = create_match_event_system();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        events.on(move |event: &TestEvent| {
            sink.lock().unwrap().push(event.message.clone());
            Ok(())
        });

        assert_eq!(events.emit(&OtherEvent), 0);
        assert_eq!(
            events.emit(&TestEvent {
                message: "hello".to_string()
            }),
            1
        );

        assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let events = create_match_event_system();
        let order = Arc::new(Mutex::new(Vec::new()));

        for index in 0..3 {
            let order = order.clone();
            events.on(move |_: &TestEvent| {
                order.lock().unwrap().push(index);
                Ok(())
            });
        }

        events.emit(&TestEvent {
            message: "ordered".to_string(),
        });
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    /// A failing handler must not prevent later handlers from running.
    #[test]
    fn test_handler_error_isolation() {
        let events = create_match_event_system();

        let handler1_executed = Arc::new(AtomicBool::new(false));
        let handler2_executed = Arc::new(AtomicBool::new(false));
        let handler3_executed = Arc::new(AtomicBool::new(false));

        let h1_flag = handler1_executed.clone();
        let h2_flag = handler2_executed.clone();
        let h3_flag = handler3_executed.clone();

        events.on(move |_: &TestEvent| {
            h1_flag.store(true, Ordering::Relaxed);
            Ok(())
        });
        events.on(move |_: &TestEvent| {
            h2_flag.store(true, Ordering::Relaxed);
            Err(EventError::HandlerExecution(
                "Intentional test failure".to_string(),
            ))
        });
        events.on(move |_: &TestEvent| {
            h3_flag.store(true, Ordering::Relaxed);
            Ok(())
        });

        events.emit(&TestEvent {
            message: "test".to_string(),
        });

        assert!(handler1_executed.load(Ordering::Relaxed));
        assert!(handler2_executed.load(Ordering::Relaxed));
        assert!(handler3_executed.load(Ordering::Relaxed));
        assert_eq!(events.get_stats().handler_failures, 1);
    }

    #[test]
    fn test_off_removes_handler() {
        let events = create_match_event_system();
        let id = events.on(|_: &TestEvent| Ok(()));

        assert!(events.off(id));
        assert!(!events.off(id));
        assert_eq!(
            events.emit(&TestEvent {
                message: "nobody".to_string()
            }),
            0
        );
    }

    #[test]
    fn test_listener_register_and_unregister() {
        let events = create_match_event_system();
        let listener = Arc::new(CountingListener {
            received: AtomicUsize::new(0),
        });

        let id = events.register_listener(listener.clone());
        assert!(events.is_registered(id));
        assert_eq!(events.listener_count(), 1);
        assert_eq!(events.get_stats().total_handlers, 2);

        events.emit(&TestEvent {
            message: "one".to_string(),
        });
        assert_eq!(listener.received.load(Ordering::SeqCst), 1);

        assert!(events.unregister_listener(id));
        assert!(!events.is_registered(id));
        assert!(!events.unregister_listener(id));
        assert_eq!(events.get_stats().total_handlers, 0);

        events.emit(&TestEvent {
            message: "two".to_string(),
        });
        assert_eq!(listener.received.load(Ordering::SeqCst), 1);
    }

    /// Unregistering one listener leaves standalone handlers in place.
    #[test]
    fn test_unregister_keeps_foreign_handlers() {
        let events = create_match_event_system();
        events.on(|_: &TestEvent| Ok(()));

        let id = events.register_listener(Arc::new(CountingListener {
            received: AtomicUsize::new(0),
        }));
        events.unregister_listener(id);

        assert_eq!(
            events.emit(&TestEvent {
                message: "still here".to_string()
            }),
            1
        );
    }

    #[test]
    fn test_event_system_stats() {
        let events = create_match_event_system();

        let initial_stats = events.get_stats();
        assert_eq!(initial_stats, EventSystemStats::default());

        events.on(|_: &TestEvent| Ok(()));
        events.on(|_: &OtherEvent| Ok(()));

        let stats_after_registration = events.get_stats();
        assert_eq!(stats_after_registration.total_handlers, 2);
        assert_eq!(stats_after_registration.events_emitted, 0);

        events.emit(&TestEvent {
            message: "test".to_string(),
        });
        events.emit(&OtherEvent);

        let final_stats = events.get_stats();
        assert_eq!(final_stats.total_handlers, 2);
        assert_eq!(final_stats.events_emitted, 2);
        assert_eq!(final_stats.handler_failures, 0);
    }

    #[test]
    fn test_handler_can_register_during_dispatch() {
        let events = create_match_event_system();
        let inner = events.clone();

        events.on(move |_: &TestEvent| {
            inner.on(|_: &OtherEvent| Ok(()));
            Ok(())
        });

        assert_eq!(
            events.emit(&TestEvent {
                message: "nested".to_string()
            }),
            1
        );
        assert_eq!(events.emit(&OtherEvent), 1);
    }
}
