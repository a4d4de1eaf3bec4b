use crate::models::conflict::Conflict;

/// Observer notified synchronously when a conflict is detected.
///
/// The engine may call from any synchronization session. A panicking
/// listener is isolated and logged; it never disturbs sibling listeners or
/// the detecting caller.
pub trait IConflictListener: Send + Sync {
    fn on_conflict_detected(&self, conflict: &Conflict);
}
