//! Listener registration and event fan-out.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard};

use chatwire_protocol::{ServerEvent, TextMessage};

/// One event delivered to registered listeners.
///
/// The wire-derived variants mirror [`ServerEvent`]; `Disconnected` is
/// generated locally when the connection goes away — whether closed by the
/// caller, by the server, or by an I/O failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The connection was closed.
    Disconnected,
    /// Outcome of a login attempt. `detail` is the raw server line.
    LoginResult { success: bool, detail: String },
    /// The list of currently connected usernames.
    UserList(Vec<String>),
    /// A public or private chat message.
    Message(TextMessage),
    /// Our last message was not delivered.
    MessageError(String),
    /// The server did not understand our last command.
    CommandError(String),
    /// The list of commands the server supports.
    SupportedCommands(Vec<String>),
}

impl From<ServerEvent> for ChatEvent {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::LoginResult { success, detail } => {
                ChatEvent::LoginResult { success, detail }
            }
            ServerEvent::UserList(names) => ChatEvent::UserList(names),
            ServerEvent::Message(message) => ChatEvent::Message(message),
            ServerEvent::MessageError(detail) => {
                ChatEvent::MessageError(detail)
            }
            ServerEvent::CommandError(detail) => {
                ChatEvent::CommandError(detail)
            }
            ServerEvent::SupportedCommands(names) => {
                ChatEvent::SupportedCommands(names)
            }
        }
    }
}

/// A subscriber notified of every event the client decodes.
///
/// Listeners are called synchronously on the background read task, in wire
/// arrival order. Implementations should hand heavy work off to their own
/// task rather than block the loop.
pub trait ChatListener: Send + Sync {
    /// Called once per decoded event.
    fn on_event(&self, event: &ChatEvent);
}

/// The current set of registered listeners.
///
/// Registration is idempotent and identity is the `Arc` pointer: adding an
/// already-registered listener is a no-op, removing an absent one is a
/// no-op. Fan-out snapshots the set and invokes listeners outside the lock,
/// so callers may add or remove listeners while an event is being
/// dispatched; changes take effect from the next event.
pub(crate) struct ListenerSet {
    inner: Mutex<Vec<Arc<dyn ChatListener>>>,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, listener: Arc<dyn ChatListener>) {
        let mut set = lock(&self.inner);
        if !set.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            set.push(listener);
        }
    }

    pub(crate) fn remove(&self, listener: &Arc<dyn ChatListener>) {
        lock(&self.inner).retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Delivers `event` to every currently registered listener.
    ///
    /// Each call is guarded: a panicking listener is logged and skipped,
    /// and the rest of the set still receives the event.
    pub(crate) fn emit(&self, event: &ChatEvent) {
        let snapshot: Vec<Arc<dyn ChatListener>> = lock(&self.inner).clone();
        for listener in snapshot {
            let delivery =
                catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
            if delivery.is_err() {
                tracing::warn!(
                    ?event,
                    "listener panicked while handling an event"
                );
            }
        }
    }
}

/// Locks a mutex, recovering the data if a panicking listener poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter {
        calls: AtomicUsize,
    }

    impl Counter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChatListener for Counter {
        fn on_event(&self, _event: &ChatEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicker;

    impl ChatListener for Panicker {
        fn on_event(&self, _event: &ChatEvent) {
            panic!("listener blew up");
        }
    }

    #[test]
    fn test_emit_reaches_every_listener_once() {
        let set = ListenerSet::new();
        let a = Counter::new();
        let b = Counter::new();
        set.add(a.clone());
        set.add(b.clone());

        set.emit(&ChatEvent::Disconnected);

        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 1);
    }

    #[test]
    fn test_adding_a_listener_twice_is_a_noop() {
        let set = ListenerSet::new();
        let counter = Counter::new();
        set.add(counter.clone());
        set.add(counter.clone());

        set.emit(&ChatEvent::Disconnected);

        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_removed_listener_no_longer_receives() {
        let set = ListenerSet::new();
        let kept = Counter::new();
        let dropped = Counter::new();
        set.add(kept.clone());
        set.add(dropped.clone());

        let handle: Arc<dyn ChatListener> = dropped.clone();
        set.remove(&handle);
        set.emit(&ChatEvent::Disconnected);

        assert_eq!(kept.count(), 1);
        assert_eq!(dropped.count(), 0);
    }

    #[test]
    fn test_removing_an_absent_listener_is_a_noop() {
        let set = ListenerSet::new();
        let registered = Counter::new();
        set.add(registered.clone());

        let stranger: Arc<dyn ChatListener> = Counter::new();
        set.remove(&stranger);
        set.emit(&ChatEvent::Disconnected);

        assert_eq!(registered.count(), 1);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_fanout() {
        let set = ListenerSet::new();
        let after = Counter::new();
        set.add(Arc::new(Panicker));
        set.add(after.clone());

        set.emit(&ChatEvent::Disconnected);
        set.emit(&ChatEvent::Disconnected);

        assert_eq!(after.count(), 2);
    }
}
