//! Entries of the offline conflict log: divergences captured locally while
//! a connector was unreachable, resolved later through the same strategy
//! vocabulary as full conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::context::EntityType;
use super::versioned::VersionedRecord;

/// Lifecycle of an offline log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineStatus {
    Pending,
    Resolved,
}

/// A pre-network conflict log entry. Simpler than a full `Conflict`: no
/// rule evaluation ran when it was queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConflict {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub local: VersionedRecord,
    pub remote: VersionedRecord,
    pub queued_at: DateTime<Utc>,
    pub status: OfflineStatus,
    pub resolved_data: Option<Value>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl OfflineConflict {
    /// New pending entry with a fresh id.
    pub fn new(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        local: VersionedRecord,
        remote: VersionedRecord,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            entity_type,
            entity_id: entity_id.into(),
            local,
            remote,
            queued_at: Utc::now(),
            status: OfflineStatus::Pending,
            resolved_data: None,
            resolved_at: None,
        }
    }

    /// Record the resolved payload and leave the pending state.
    pub fn mark_resolved(&mut self, resolved: Value) {
        self.status = OfflineStatus::Resolved;
        self.resolved_data = Some(resolved);
        self.resolved_at = Some(Utc::now());
    }
}
