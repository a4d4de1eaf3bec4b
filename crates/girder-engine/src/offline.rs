//! Offline conflict queue — the local-only, pre-network conflict log.
//!
//! Entries are captured while connectors are unreachable and resolved
//! later through the same strategy vocabulary as full conflicts. No rules
//! ran when an entry was queued, so rule-dependent strategies degrade to
//! their documented fallbacks.

use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, info};

use girder_core::errors::{EngineResult, OfflineResolutionError};
use girder_core::models::offline::{OfflineConflict, OfflineStatus};
use girder_core::models::rule::ResolutionStrategy;

use crate::resolution;

/// Local-only queue of conflicts captured while disconnected.
#[derive(Default)]
pub struct OfflineQueue {
    entries: DashMap<String, OfflineConflict>,
}

impl OfflineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, entry: OfflineConflict) {
        debug!(entry_id = %entry.id, entity_id = %entry.entity_id, "offline conflict queued");
        self.entries.insert(entry.id.clone(), entry);
    }

    /// Entries still awaiting resolution, oldest first.
    pub fn pending(&self) -> Vec<OfflineConflict> {
        let mut pending: Vec<OfflineConflict> = self
            .entries
            .iter()
            .filter(|entry| entry.status == OfflineStatus::Pending)
            .map(|entry| entry.clone())
            .collect();
        pending.sort_by_key(|entry| entry.queued_at);
        pending
    }

    pub fn get(&self, id: &str) -> Option<OfflineConflict> {
        self.entries.get(id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve one entry. Re-resolving a resolved entry returns the stored
    /// payload without re-running strategy logic.
    pub fn resolve(
        &self,
        id: &str,
        strategy: ResolutionStrategy,
        custom_data: Option<Value>,
        merge_max_depth: usize,
    ) -> EngineResult<Value> {
        let mut entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| OfflineResolutionError::EntryNotFound { id: id.to_string() })?;

        if entry.status == OfflineStatus::Resolved {
            if let Some(stored) = entry.resolved_data.clone() {
                debug!(entry_id = %id, "offline conflict already resolved; returning stored payload");
                return Ok(stored);
            }
        }

        let resolved = resolution::apply_strategy(
            &entry.local,
            &entry.remote,
            strategy,
            custom_data.as_ref(),
            None,
            merge_max_depth,
        );
        entry.mark_resolved(resolved.clone());
        info!(entry_id = %id, strategy = %strategy, "offline conflict resolved");
        Ok(resolved)
    }
}
