//! DashMap-backed `IConflictStore` for tests and embedded use.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use girder_core::errors::StoreError;
use girder_core::models::conflict::Conflict;
use girder_core::models::rule::ResolutionRule;
use girder_core::traits::store::{ConflictFilter, IConflictStore};

/// Concurrent in-memory store. Records carry an insertion sequence so
/// listings are deterministic and rule listings preserve registration
/// order.
#[derive(Default)]
pub struct MemoryStore {
    conflicts: DashMap<String, (u64, Conflict)>,
    rules: DashMap<String, (u64, ResolutionRule)>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

impl IConflictStore for MemoryStore {
    fn create_conflict(&self, conflict: &Conflict) -> Result<(), StoreError> {
        match self.conflicts.entry(conflict.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                key: conflict.id.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert((self.next_seq(), conflict.clone()));
                Ok(())
            }
        }
    }

    fn get_conflict(&self, id: &str) -> Result<Option<Conflict>, StoreError> {
        Ok(self.conflicts.get(id).map(|entry| entry.value().1.clone()))
    }

    fn update_conflict(&self, conflict: &Conflict) -> Result<(), StoreError> {
        let mut entry = self
            .conflicts
            .get_mut(&conflict.id)
            .ok_or_else(|| StoreError::NotFound {
                key: conflict.id.clone(),
            })?;
        entry.value_mut().1 = conflict.clone();
        Ok(())
    }

    fn delete_conflict(&self, id: &str) -> Result<(), StoreError> {
        self.conflicts.remove(id);
        Ok(())
    }

    fn list_conflicts(&self) -> Result<Vec<Conflict>, StoreError> {
        let mut records: Vec<(u64, Conflict)> = self
            .conflicts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|(seq, _)| *seq);
        Ok(records.into_iter().map(|(_, conflict)| conflict).collect())
    }

    fn filter_conflicts(&self, filter: &ConflictFilter) -> Result<Vec<Conflict>, StoreError> {
        Ok(self
            .list_conflicts()?
            .into_iter()
            .filter(|conflict| filter.matches(conflict))
            .collect())
    }

    fn create_rule(&self, rule: &ResolutionRule) -> Result<(), StoreError> {
        match self.rules.entry(rule.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                key: rule.id.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert((self.next_seq(), rule.clone()));
                Ok(())
            }
        }
    }

    fn update_rule(&self, rule: &ResolutionRule) -> Result<(), StoreError> {
        let mut entry = self
            .rules
            .get_mut(&rule.id)
            .ok_or_else(|| StoreError::NotFound {
                key: rule.id.clone(),
            })?;
        entry.value_mut().1 = rule.clone();
        Ok(())
    }

    fn delete_rule(&self, id: &str) -> Result<(), StoreError> {
        self.rules.remove(id);
        Ok(())
    }

    fn list_rules(&self) -> Result<Vec<ResolutionRule>, StoreError> {
        let mut records: Vec<(u64, ResolutionRule)> = self
            .rules
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|(seq, _)| *seq);
        Ok(records.into_iter().map(|(_, rule)| rule).collect())
    }
}
