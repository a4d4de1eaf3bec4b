use chrono::{DateTime, Utc};

use crate::errors::StoreError;
use crate::models::conflict::{Conflict, ConflictKind, ConflictStatus};
use crate::models::context::EntityType;
use crate::models::rule::ResolutionRule;

/// Filter over stored conflicts. Fields are conjunctive; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct ConflictFilter {
    pub status: Option<ConflictStatus>,
    pub entity_type: Option<EntityType>,
    pub kind: Option<ConflictKind>,
    pub created_before: Option<DateTime<Utc>>,
}

impl ConflictFilter {
    pub fn matches(&self, conflict: &Conflict) -> bool {
        if let Some(status) = self.status {
            if conflict.status != status {
                return false;
            }
        }
        if let Some(entity_type) = self.entity_type {
            if conflict.entity_type != entity_type {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if conflict.kind != kind {
                return false;
            }
        }
        if let Some(cutoff) = self.created_before {
            if conflict.created_at >= cutoff {
                return false;
            }
        }
        true
    }
}

/// Durable keyed storage for conflict and rule records.
///
/// `delete_*` calls are idempotent: deleting a missing key succeeds, so
/// retention cleanup is safe alongside concurrent mutation.
pub trait IConflictStore: Send + Sync {
    // --- Conflicts ---
    fn create_conflict(&self, conflict: &Conflict) -> Result<(), StoreError>;
    fn get_conflict(&self, id: &str) -> Result<Option<Conflict>, StoreError>;
    fn update_conflict(&self, conflict: &Conflict) -> Result<(), StoreError>;
    fn delete_conflict(&self, id: &str) -> Result<(), StoreError>;
    fn list_conflicts(&self) -> Result<Vec<Conflict>, StoreError>;
    fn filter_conflicts(&self, filter: &ConflictFilter) -> Result<Vec<Conflict>, StoreError>;

    // --- Rules ---
    fn create_rule(&self, rule: &ResolutionRule) -> Result<(), StoreError>;
    fn update_rule(&self, rule: &ResolutionRule) -> Result<(), StoreError>;
    fn delete_rule(&self, id: &str) -> Result<(), StoreError>;
    fn list_rules(&self) -> Result<Vec<ResolutionRule>, StoreError>;
}
