use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One side of a potential conflict: an entity snapshot plus its update
/// timestamp and originating source. Immutable once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedRecord {
    /// The entity snapshot as a JSON tree.
    pub data: Value,
    /// When this side was last updated, if the source reported it.
    pub timestamp: Option<DateTime<Utc>>,
    /// Name of the system this version came from (e.g. "app", "erp").
    pub source: String,
    /// Monotonic version counter, if the source tracks one.
    pub version: Option<u64>,
}

impl VersionedRecord {
    /// Capture a snapshot from a named source.
    pub fn new(
        data: Value,
        timestamp: Option<DateTime<Utc>>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            data,
            timestamp,
            source: source.into(),
            version: None,
        }
    }

    /// Absolute millisecond gap between this record's timestamp and
    /// another's. `None` when either side carries no timestamp.
    pub fn timestamp_gap_ms(&self, other: &Self) -> Option<i64> {
        match (self.timestamp, other.timestamp) {
            (Some(a), Some(b)) => Some((a - b).num_milliseconds().abs()),
            _ => None,
        }
    }
}
