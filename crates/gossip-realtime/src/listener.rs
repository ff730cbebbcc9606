//! Listener registry with ordered, synchronous dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::event::{EventKind, PresenceEvent};

/// Handle returned by [`ListenerRegistry::on`], used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A registered callback.
pub type Listener = Arc<dyn Fn(&PresenceEvent) + Send + Sync>;

struct Entry {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Per-kind listener lists.
///
/// Listeners run on the emitting thread in registration order. There is no
/// queue between emitter and listener, so a slow listener slows the emitter.
pub struct ListenerRegistry {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `listener` for events of `kind`.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&PresenceEvent) + Send + Sync + 'static,
    {
        self.register(kind, Arc::new(listener))
    }

    /// Register an already shared listener.
    pub fn register(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Entry { id, kind, listener });
        id
    }

    /// Remove a listener. Returns `false` if the id was unknown.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Deliver `event` to every listener of its kind.
    ///
    /// The list is snapshotted first, so listeners may register or
    /// deregister from inside a callback.
    pub fn emit(&self, event: &PresenceEvent) {
        let kind = event.kind();
        let targets: Vec<Listener> = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| Arc::clone(&e.listener))
            .collect();

        for listener in targets {
            listener(event);
        }
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn dispatches_in_registration_order_by_kind() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            registry.on(EventKind::Connect, move |_| seen.lock().unwrap().push(tag));
        }
        let other = Arc::clone(&seen);
        registry.on(EventKind::Disconnect, move |_| other.lock().unwrap().push("disconnect"));

        registry.emit(&PresenceEvent::Connect);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn off_removes_only_that_listener() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicU64::new(0));

        let a = Arc::clone(&hits);
        let id = registry.on(EventKind::Connect, move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });
        let b = Arc::clone(&hits);
        registry.on(EventKind::Connect, move |_| {
            b.fetch_add(10, Ordering::SeqCst);
        });

        assert!(registry.off(id));
        assert!(!registry.off(id));
        registry.emit(&PresenceEvent::Connect);
        assert_eq!(hits.load(Ordering::SeqCst), 10);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn listener_may_deregister_itself() {
        let registry = Arc::new(ListenerRegistry::new());
        let slot = Arc::new(Mutex::new(None::<ListenerId>));

        let reg = Arc::clone(&registry);
        let own = Arc::clone(&slot);
        let id = registry.on(EventKind::Connect, move |_| {
            if let Some(id) = *own.lock().unwrap() {
                reg.off(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        registry.emit(&PresenceEvent::Connect);
        assert!(registry.is_empty());
    }
}
