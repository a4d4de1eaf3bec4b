//! Statistics aggregation and retention cleanup.

use chrono::{Duration, Utc};
use tracing::info;

use girder_core::constants::SYSTEM_RESOLVER;
use girder_core::errors::{AdminError, EngineResult};
use girder_core::models::conflict::ConflictStatus;
use girder_core::models::statistics::ConflictStatistics;
use girder_core::traits::store::IConflictStore;

/// Read-only aggregation over every stored conflict.
pub fn aggregate(store: &dyn IConflictStore) -> EngineResult<ConflictStatistics> {
    let conflicts = store.list_conflicts().map_err(|error| AdminError::StatisticsFailed {
        reason: error.to_string(),
    })?;

    let mut statistics = ConflictStatistics::default();
    for conflict in &conflicts {
        statistics.total += 1;
        match conflict.status {
            ConflictStatus::Detected => statistics.pending += 1,
            ConflictStatus::Ignored => statistics.ignored += 1,
            ConflictStatus::Resolved => {
                statistics.resolved += 1;
                match conflict.resolved_by.as_deref() {
                    Some(SYSTEM_RESOLVER) => statistics.auto_resolved += 1,
                    _ => statistics.manually_resolved += 1,
                }
                *statistics
                    .by_strategy
                    .entry(conflict.strategy.to_string())
                    .or_insert(0) += 1;
            }
        }
    }
    Ok(statistics)
}

/// Delete terminal conflicts older than the retention window.
///
/// Conflicts still in `Detected` are never removed, whatever their age, so
/// cleanup is safe to run alongside detection and resolution.
pub fn cleanup(store: &dyn IConflictStore, retention_days: u32) -> EngineResult<usize> {
    let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
    let conflicts = store.list_conflicts().map_err(|error| AdminError::CleanupFailed {
        removed: 0,
        reason: error.to_string(),
    })?;

    let mut removed = 0usize;
    for conflict in conflicts {
        if conflict.status.is_terminal() && conflict.created_at < cutoff {
            store
                .delete_conflict(&conflict.id)
                .map_err(|error| AdminError::CleanupFailed {
                    removed,
                    reason: error.to_string(),
                })?;
            removed += 1;
        }
    }
    info!(removed, retention_days, "retention cleanup complete");
    Ok(removed)
}
