//! Conflict detection — timestamp- and field-based divergence discovery.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use girder_core::constants::CONCURRENT_EDIT_TOLERANCE_MS;
use girder_core::errors::DetectionError;
use girder_core::models::conflict::{
    Conflict, ConflictKind, ConflictMetadata, DetectionMethod, Severity,
};
use girder_core::models::context::DetectionContext;
use girder_core::models::rule::ResolutionStrategy;
use girder_core::models::summary::{DetectionOutcome, DetectionSummary};
use girder_core::models::versioned::VersionedRecord;

use girder_merge::diff_fields;

/// Stateless detection pass over one `(local, remote)` pair.
///
/// Emits at most one conflict: a concurrent modification when the update
/// timestamps are more than a second apart, otherwise a data-version
/// conflict when any non-bookkeeping field differs. Two snapshots that
/// agree on both checks produce nothing.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Run both checks and tally a summary.
    ///
    /// Pure apart from clock reads; the caller owns persistence, listener
    /// fan-out, and rule lookup. Snapshots that are not JSON objects are a
    /// detection-level error, not a conflict record.
    #[instrument(skip(local, remote, context), fields(entity_id = %context.entity_id))]
    pub fn detect(
        local: &VersionedRecord,
        remote: &VersionedRecord,
        context: &DetectionContext,
        default_strategy: ResolutionStrategy,
    ) -> Result<DetectionOutcome, DetectionError> {
        let local_fields = as_object(local, context)?;
        let remote_fields = as_object(remote, context)?;

        let mut conflicts = Vec::new();

        // Timestamp check first: a gap beyond the tolerance means both
        // sides were edited independently, which subsumes any field-level
        // divergence the same pair would show.
        let concurrent = match local.timestamp_gap_ms(remote) {
            Some(gap_ms) if gap_ms > CONCURRENT_EDIT_TOLERANCE_MS => {
                let severity = Severity::from_timestamp_gap(gap_ms);
                debug!(gap_ms, ?severity, "concurrent modification detected");
                conflicts.push(Conflict::new(
                    ConflictKind::ConcurrentModification,
                    context,
                    local.clone(),
                    remote.clone(),
                    default_strategy,
                    severity,
                    ConflictMetadata {
                        detection_method: DetectionMethod::Automatic,
                        affected_fields: None,
                        details: Some(format!("update timestamps {gap_ms}ms apart")),
                    },
                ));
                true
            }
            _ => false,
        };

        if !concurrent {
            let affected = diff_fields(local_fields, remote_fields);
            if !affected.is_empty() {
                let severity = Severity::from_affected_fields(affected.len());
                debug!(affected = affected.len(), ?severity, "field divergence detected");
                conflicts.push(Conflict::new(
                    ConflictKind::DataVersion,
                    context,
                    local.clone(),
                    remote.clone(),
                    default_strategy,
                    severity,
                    ConflictMetadata {
                        detection_method: DetectionMethod::Automatic,
                        affected_fields: Some(affected),
                        details: None,
                    },
                ));
            }
        }

        let mut summary = DetectionSummary::default();
        for conflict in &conflicts {
            summary.record(conflict);
        }
        Ok(DetectionOutcome { conflicts, summary })
    }
}

fn as_object<'a>(
    record: &'a VersionedRecord,
    context: &DetectionContext,
) -> Result<&'a Map<String, Value>, DetectionError> {
    record
        .data
        .as_object()
        .ok_or_else(|| DetectionError::MalformedInput {
            entity_id: context.entity_id.clone(),
            reason: format!("{} snapshot is not a JSON object", record.source),
        })
}
