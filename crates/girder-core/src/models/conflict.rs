//! The Conflict record and its vocabulary enums.
//!
//! A conflict is created only by the detector and mutated only by the
//! resolution path (status and the `resolved_*` fields). Severity is fixed
//! at detection time from the divergence magnitude and never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::context::{DetectionContext, EntityType};
use super::rule::ResolutionStrategy;
use super::versioned::VersionedRecord;
use crate::constants::HIGH_SEVERITY_GAP_MS;

/// How two versions of the same entity diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Field-level divergence between two snapshots.
    DataVersion,
    /// Both sides were edited within overlapping time windows.
    ConcurrentModification,
    /// The two sides disagree on the entity's shape.
    SchemaMismatch,
    /// One side fails domain validation.
    ValidationError,
    /// The connector reported an integration-level failure.
    IntegrationError,
}

/// Lifecycle state of a conflict. `Resolved` and `Ignored` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Detected,
    Resolved,
    Ignored,
}

impl ConflictStatus {
    /// Terminal states permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConflictStatus::Resolved | ConflictStatus::Ignored)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStatus::Detected => "detected",
            ConflictStatus::Resolved => "resolved",
            ConflictStatus::Ignored => "ignored",
        }
    }
}

/// Divergence magnitude, fixed at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Severity of a field-level divergence: more than 5 affected fields is
    /// high, 3–5 medium, 1–2 low.
    pub fn from_affected_fields(count: usize) -> Self {
        if count > 5 {
            Severity::High
        } else if count >= 3 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Severity of a concurrent modification from the timestamp gap.
    pub fn from_timestamp_gap(gap_ms: i64) -> Self {
        if gap_ms > HIGH_SEVERITY_GAP_MS {
            Severity::High
        } else {
            Severity::Medium
        }
    }

    /// Percentile score compared against the 0–100 config thresholds.
    pub fn score(&self) -> u8 {
        match self {
            Severity::Low => 25,
            Severity::Medium => 50,
            Severity::High => 75,
            Severity::Critical => 100,
        }
    }
}

/// How a conflict was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Automatic,
    Manual,
}

/// Detection bookkeeping attached to a conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictMetadata {
    pub detection_method: DetectionMethod,
    /// Top-level fields that differ, for data-version conflicts.
    pub affected_fields: Option<Vec<String>>,
    pub details: Option<String>,
}

/// A detected divergence between two versions of the same logical entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// UUID v4 identifier.
    pub id: String,
    pub kind: ConflictKind,
    pub entity_type: EntityType,
    pub entity_id: String,
    /// The application's own version.
    pub local: VersionedRecord,
    /// The externally synchronized version.
    pub remote: VersionedRecord,
    /// Strategy the detector proposes: the applicable rule's, else the
    /// configured default. The resolution path overwrites this with the
    /// strategy actually applied.
    pub strategy: ResolutionStrategy,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_data: Option<Value>,
    pub status: ConflictStatus,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub metadata: ConflictMetadata,
}

impl Conflict {
    /// New conflict in `Detected` state with a fresh id.
    pub fn new(
        kind: ConflictKind,
        context: &DetectionContext,
        local: VersionedRecord,
        remote: VersionedRecord,
        strategy: ResolutionStrategy,
        severity: Severity,
        metadata: ConflictMetadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            entity_type: context.entity_type,
            entity_id: context.entity_id.clone(),
            local,
            remote,
            strategy,
            resolved_by: None,
            resolved_at: None,
            resolved_data: None,
            status: ConflictStatus::Detected,
            severity,
            created_at: Utc::now(),
            metadata,
        }
    }

    /// Transition to `Resolved`, recording the payload and resolver identity.
    pub fn mark_resolved(&mut self, resolved: Value, resolved_by: &str) {
        self.status = ConflictStatus::Resolved;
        self.resolved_data = Some(resolved);
        self.resolved_by = Some(resolved_by.to_string());
        self.resolved_at = Some(Utc::now());
    }

    /// Transition to `Ignored`. No payload is produced.
    pub fn mark_ignored(&mut self, ignored_by: &str) {
        self.status = ConflictStatus::Ignored;
        self.resolved_by = Some(ignored_by.to_string());
        self.resolved_at = Some(Utc::now());
    }
}
