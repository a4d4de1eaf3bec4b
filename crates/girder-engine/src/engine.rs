//! ConflictEngine — one instance-owned surface over detection, resolution,
//! rules, listeners, statistics, and the offline queue.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use girder_core::config::EngineConfig;
use girder_core::constants::SYSTEM_RESOLVER;
use girder_core::errors::{EngineError, EngineResult, ResolutionError, StoreError};
use girder_core::models::conflict::{Conflict, ConflictStatus};
use girder_core::models::context::DetectionContext;
use girder_core::models::offline::OfflineConflict;
use girder_core::models::rule::{ResolutionRule, ResolutionStrategy};
use girder_core::models::statistics::ConflictStatistics;
use girder_core::models::summary::DetectionOutcome;
use girder_core::models::versioned::VersionedRecord;
use girder_core::traits::listener::IConflictListener;
use girder_core::traits::store::{ConflictFilter, IConflictStore};
use girder_core::traits::writeback::IWritebackSink;

use crate::detector::ConflictDetector;
use crate::listeners::{ListenerId, ListenerRegistry};
use crate::offline::OfflineQueue;
use crate::resolution;
use crate::rules::RuleRegistry;
use crate::stats;

/// Result of the state-machine check at the start of a resolution call.
enum ResolutionEntry {
    /// Terminal no-op: the stored payload from the first resolution.
    AlreadyResolved(Value),
    /// Still in `Detected`; strategy logic may run.
    Pending(Conflict),
}

/// One independently configured conflict engine instance.
///
/// All shared state lives here: the rule registry and config are
/// read-mostly and hot-swappable (last writer wins); detection and
/// resolution of different conflict ids run fully in parallel. The engine
/// performs no I/O of its own — persistence and connector write-through go
/// through the injected collaborators.
pub struct ConflictEngine {
    store: Arc<dyn IConflictStore>,
    config: RwLock<EngineConfig>,
    rules: RuleRegistry,
    listeners: ListenerRegistry,
    sinks: RwLock<Vec<Arc<dyn IWritebackSink>>>,
    offline: OfflineQueue,
}

impl ConflictEngine {
    /// Create an engine over a persistence collaborator. The config is
    /// validated the same way later `update_config` swaps are.
    pub fn new(store: Arc<dyn IConflictStore>, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config: RwLock::new(config),
            rules: RuleRegistry::new(),
            listeners: ListenerRegistry::new(),
            sinks: RwLock::new(Vec::new()),
            offline: OfflineQueue::new(),
        })
    }

    /// Snapshot of the current config.
    pub fn config(&self) -> EngineConfig {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// Swap the config. Last writer wins; in-flight calls keep the
    /// snapshot they already read.
    pub fn update_config(&self, config: EngineConfig) -> EngineResult<()> {
        config.validate()?;
        *self.config.write().expect("config lock poisoned") = config;
        info!("engine config updated");
        Ok(())
    }

    // --- Detection ---

    /// Detect conflicts between two versions of one entity.
    ///
    /// Each emitted conflict is written through the store before any
    /// listener observes it — a conflict is fully recorded or not recorded
    /// at all. When the applicable rule allows auto-resolution and the
    /// severity is within the configured threshold, the conflict is
    /// resolved in the same call with `resolved_by = "system"`.
    #[instrument(skip(self, local, remote, context), fields(entity_id = %context.entity_id))]
    pub fn detect(
        &self,
        local: &VersionedRecord,
        remote: &VersionedRecord,
        context: &DetectionContext,
    ) -> EngineResult<DetectionOutcome> {
        let config = self.config();
        let DetectionOutcome { conflicts, summary } =
            ConflictDetector::detect(local, remote, context, config.default_strategy)?;

        let mut recorded = Vec::with_capacity(conflicts.len());
        for mut conflict in conflicts {
            let rule = self.rules.find_applicable(&conflict);
            if let Some(rule) = &rule {
                conflict.strategy = rule.resolution.strategy;
            }
            self.store.create_conflict(&conflict)?;
            info!(
                conflict_id = %conflict.id,
                kind = ?conflict.kind,
                severity = ?conflict.severity,
                "conflict recorded"
            );
            if conflict.severity.score() >= config.notification_severity_threshold {
                warn!(
                    conflict_id = %conflict.id,
                    severity = ?conflict.severity,
                    entity_id = %conflict.entity_id,
                    "conflict requires operator attention"
                );
            }
            self.listeners.notify_detected(&conflict);

            if let Some(rule) = &rule {
                if rule.resolution.auto_resolve
                    && conflict.severity.score() <= config.auto_resolve_severity_threshold
                {
                    match self.resolve(
                        &conflict.id,
                        rule.resolution.strategy,
                        None,
                        SYSTEM_RESOLVER,
                    ) {
                        Ok(_) => {
                            if let Some(updated) = self.store.get_conflict(&conflict.id)? {
                                conflict = updated;
                            }
                        }
                        Err(error) => warn!(
                            conflict_id = %conflict.id,
                            %error,
                            "auto-resolution failed; conflict left pending"
                        ),
                    }
                }
            }
            recorded.push(conflict);
        }

        info!(total = summary.total, "detection pass complete");
        Ok(DetectionOutcome {
            conflicts: recorded,
            summary,
        })
    }

    // --- Resolution ---

    /// Resolve a conflict with an explicitly chosen strategy.
    ///
    /// Re-resolving an already-resolved conflict is a no-op returning the
    /// stored payload, so the call is idempotent under retry or duplicate
    /// dispatch. The record is updated through the store before connector
    /// write-through; a failing sink surfaces as an error but the conflict
    /// stays resolved.
    #[instrument(skip(self, custom_data))]
    pub fn resolve(
        &self,
        conflict_id: &str,
        strategy: ResolutionStrategy,
        custom_data: Option<Value>,
        resolved_by: &str,
    ) -> EngineResult<Value> {
        let mut conflict = match self.begin_resolution(conflict_id)? {
            ResolutionEntry::AlreadyResolved(stored) => return Ok(stored),
            ResolutionEntry::Pending(conflict) => conflict,
        };

        let config = self.config();
        let rule = self.rules.find_applicable(&conflict);
        let resolved = resolution::apply_strategy(
            &conflict.local,
            &conflict.remote,
            strategy,
            custom_data.as_ref(),
            rule.as_ref(),
            config.merge_max_depth,
        );

        conflict.strategy = strategy;
        self.finish_resolution(conflict, resolved, resolved_by)
    }

    /// Resolve with a strategy supplied as a string by the administration
    /// surface. An unrecognized name keeps the application's own version,
    /// preserving the engine's historical lenient behavior.
    pub fn resolve_named(
        &self,
        conflict_id: &str,
        strategy: &str,
        custom_data: Option<Value>,
        resolved_by: &str,
    ) -> EngineResult<Value> {
        match strategy.parse::<ResolutionStrategy>() {
            Ok(parsed) => self.resolve(conflict_id, parsed, custom_data, resolved_by),
            Err(_) => {
                warn!(
                    conflict_id,
                    strategy, "unrecognized strategy; falling back to the local version"
                );
                let conflict = match self.begin_resolution(conflict_id)? {
                    ResolutionEntry::AlreadyResolved(stored) => return Ok(stored),
                    ResolutionEntry::Pending(conflict) => conflict,
                };
                let resolved = conflict.local.data.clone();
                self.finish_resolution(conflict, resolved, resolved_by)
            }
        }
    }

    /// Mark a conflict ignored. Terminal; no payload is produced. Ignoring
    /// an already-ignored conflict is a no-op.
    #[instrument(skip(self))]
    pub fn ignore(&self, conflict_id: &str, ignored_by: &str) -> EngineResult<()> {
        let mut conflict = self.get_required(conflict_id)?;
        match conflict.status {
            ConflictStatus::Ignored => return Ok(()),
            ConflictStatus::Resolved => {
                return Err(ResolutionError::TerminalState {
                    id: conflict_id.to_string(),
                    status: conflict.status.as_str().to_string(),
                }
                .into());
            }
            ConflictStatus::Detected => {}
        }
        conflict.mark_ignored(ignored_by);
        self.store.update_conflict(&conflict)?;
        info!(conflict_id, ignored_by, "conflict ignored");
        Ok(())
    }

    // --- Rules ---

    /// Validate, register, and persist a rule.
    pub fn add_rule(&self, rule: ResolutionRule) -> EngineResult<()> {
        self.rules.add(rule.clone())?;
        if let Err(error) = self.store.create_rule(&rule) {
            // Keep registry and store consistent.
            self.rules.remove(&rule.id);
            return Err(error.into());
        }
        Ok(())
    }

    /// Remove a rule from the registry and the store. Returns whether it
    /// was registered.
    pub fn remove_rule(&self, id: &str) -> EngineResult<bool> {
        let removed = self.rules.remove(id);
        if removed {
            self.store.delete_rule(id)?;
        }
        Ok(removed)
    }

    /// Activate or deactivate a rule without losing its registration slot.
    pub fn set_rule_active(&self, id: &str, active: bool) -> EngineResult<bool> {
        match self.rules.set_active(id, active) {
            Some(updated) => {
                self.store.update_rule(&updated)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn list_rules(&self) -> Vec<ResolutionRule> {
        self.rules.list()
    }

    // --- Listeners & sinks ---

    pub fn subscribe(&self, listener: Arc<dyn IConflictListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: &ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Register a connector write-through sink.
    pub fn register_sink(&self, sink: Arc<dyn IWritebackSink>) {
        self.sinks.write().expect("sink lock poisoned").push(sink);
    }

    /// Conflicts awaiting an operator decision, for the administration
    /// surface.
    pub fn pending_conflicts(&self) -> EngineResult<Vec<Conflict>> {
        let filter = ConflictFilter {
            status: Some(ConflictStatus::Detected),
            ..ConflictFilter::default()
        };
        Ok(self.store.filter_conflicts(&filter)?)
    }

    // --- Statistics & retention ---

    pub fn statistics(&self) -> EngineResult<ConflictStatistics> {
        stats::aggregate(self.store.as_ref())
    }

    /// Purge terminal conflicts past the retention window. Returns the
    /// number removed.
    pub fn cleanup(&self) -> EngineResult<usize> {
        stats::cleanup(self.store.as_ref(), self.config().conflict_retention_days)
    }

    // --- Offline queue ---

    pub fn enqueue_offline(&self, entry: OfflineConflict) {
        self.offline.enqueue(entry);
    }

    pub fn pending_offline(&self) -> Vec<OfflineConflict> {
        self.offline.pending()
    }

    /// Resolve an offline log entry through the shared strategy vocabulary.
    pub fn resolve_offline(
        &self,
        id: &str,
        strategy: ResolutionStrategy,
        custom_data: Option<Value>,
    ) -> EngineResult<Value> {
        self.offline
            .resolve(id, strategy, custom_data, self.config().merge_max_depth)
    }

    // --- Internals ---

    fn get_required(&self, conflict_id: &str) -> EngineResult<Conflict> {
        self.store
            .get_conflict(conflict_id)?
            .ok_or_else(|| {
                ResolutionError::ConflictNotFound {
                    id: conflict_id.to_string(),
                }
                .into()
            })
    }

    /// Enforce the state machine at the start of a resolution call.
    fn begin_resolution(&self, conflict_id: &str) -> EngineResult<ResolutionEntry> {
        let conflict = self.get_required(conflict_id)?;
        match conflict.status {
            ConflictStatus::Resolved => {
                debug!(conflict_id, "conflict already resolved; returning stored payload");
                let stored = conflict.resolved_data.ok_or_else(|| {
                    EngineError::Store(StoreError::Backend {
                        message: format!("resolved conflict {conflict_id} has no stored payload"),
                    })
                })?;
                Ok(ResolutionEntry::AlreadyResolved(stored))
            }
            ConflictStatus::Ignored => Err(ResolutionError::TerminalState {
                id: conflict_id.to_string(),
                status: conflict.status.as_str().to_string(),
            }
            .into()),
            ConflictStatus::Detected => Ok(ResolutionEntry::Pending(conflict)),
        }
    }

    /// Persist the transition and hand the payload to the write-through
    /// sinks.
    fn finish_resolution(
        &self,
        mut conflict: Conflict,
        resolved: Value,
        resolved_by: &str,
    ) -> EngineResult<Value> {
        conflict.mark_resolved(resolved.clone(), resolved_by);
        self.store.update_conflict(&conflict)?;
        info!(
            conflict_id = %conflict.id,
            strategy = %conflict.strategy,
            resolved_by,
            "conflict resolved"
        );
        self.write_through(&conflict, &resolved)?;
        Ok(resolved)
    }

    fn write_through(&self, conflict: &Conflict, resolved: &Value) -> EngineResult<()> {
        let sinks = self.sinks.read().expect("sink lock poisoned").clone();
        for sink in &sinks {
            sink.write_back(conflict, resolved).map_err(|error| {
                ResolutionError::WritebackFailed {
                    connector: sink.name().to_string(),
                    reason: error.to_string(),
                }
            })?;
        }
        Ok(())
    }
}
