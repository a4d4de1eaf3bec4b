//! Listener fan-out — explicit observer registry with per-listener
//! isolation.
//!
//! Notification is synchronous. A panicking listener is caught and logged;
//! it never blocks sibling listeners or the detecting caller.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tracing::warn;
use uuid::Uuid;

use girder_core::models::conflict::Conflict;
use girder_core::traits::listener::IConflictListener;

/// Handle returned by `subscribe`; pass to `unsubscribe` to remove.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(String);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of conflict observers.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<(ListenerId, Arc<dyn IConflictListener>)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer and return its removal handle.
    pub fn subscribe(&self, listener: Arc<dyn IConflictListener>) -> ListenerId {
        let id = ListenerId(Uuid::new_v4().to_string());
        self.listeners
            .write()
            .expect("listener lock poisoned")
            .push((id.clone(), listener));
        id
    }

    /// Remove an observer. Returns whether the handle was registered.
    pub fn unsubscribe(&self, id: &ListenerId) -> bool {
        let mut listeners = self.listeners.write().expect("listener lock poisoned");
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| listener_id != id);
        listeners.len() != before
    }

    pub fn count(&self) -> usize {
        self.listeners.read().expect("listener lock poisoned").len()
    }

    /// Notify every observer of a detected conflict.
    ///
    /// The listener list is snapshotted outside the lock so a slow
    /// listener cannot block subscription changes.
    pub fn notify_detected(&self, conflict: &Conflict) {
        let listeners = self
            .listeners
            .read()
            .expect("listener lock poisoned")
            .clone();
        for (id, listener) in &listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                listener.on_conflict_detected(conflict);
            }));
            if outcome.is_err() {
                warn!(
                    listener_id = %id,
                    conflict_id = %conflict.id,
                    "conflict listener panicked; continuing with remaining listeners"
                );
            }
        }
    }
}
