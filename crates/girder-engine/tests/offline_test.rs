//! Offline conflict queue tests: queueing, ordering, and resolution via
//! the shared strategy vocabulary.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use girder_core::config::EngineConfig;
use girder_core::errors::{EngineError, OfflineResolutionError};
use girder_core::models::context::EntityType;
use girder_core::models::offline::{OfflineConflict, OfflineStatus};
use girder_core::models::rule::ResolutionStrategy;
use girder_core::models::versioned::VersionedRecord;
use girder_engine::{ConflictEngine, MemoryStore, OfflineQueue};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn record(data: Value, offset_ms: i64, source: &str) -> VersionedRecord {
    VersionedRecord::new(
        data,
        Some(base_time() + Duration::milliseconds(offset_ms)),
        source,
    )
}

fn entry(entity_id: &str, local: VersionedRecord, remote: VersionedRecord) -> OfflineConflict {
    OfflineConflict::new(EntityType::Task, entity_id, local, remote)
}

#[test]
fn pending_lists_unresolved_entries_oldest_first() {
    let queue = OfflineQueue::new();

    let mut first = entry(
        "task-1",
        record(json!({"a": 1}), 0, "app"),
        record(json!({"a": 2}), 0, "erp"),
    );
    first.queued_at = base_time();
    let mut second = entry(
        "task-2",
        record(json!({"b": 1}), 0, "app"),
        record(json!({"b": 2}), 0, "erp"),
    );
    second.queued_at = base_time() + Duration::seconds(10);

    queue.enqueue(second.clone());
    queue.enqueue(first.clone());

    let pending = queue.pending();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, first.id);
    assert_eq!(pending[1].id, second.id);
}

#[test]
fn timestamp_wins_resolves_an_offline_entry() {
    let queue = OfflineQueue::new();
    let item = entry(
        "task-1",
        record(json!({"status": "in_progress"}), 0, "app"),
        record(json!({"status": "done"}), 5_000, "erp"),
    );
    let id = item.id.clone();
    queue.enqueue(item);

    let resolved = queue
        .resolve(&id, ResolutionStrategy::TimestampWins, None, 10)
        .expect("resolve");
    assert_eq!(resolved, json!({"status": "done"}));

    let stored = queue.get(&id).expect("entry exists");
    assert_eq!(stored.status, OfflineStatus::Resolved);
    assert_eq!(stored.resolved_data, Some(json!({"status": "done"})));
    assert!(queue.pending().is_empty());
}

#[test]
fn merge_strategy_merges_offline_entries() {
    let queue = OfflineQueue::new();
    let item = entry(
        "task-1",
        record(json!({"a": 1, "c": [1, 2]}), 0, "app"),
        record(json!({"a": 2, "c": [2, 3]}), 0, "erp"),
    );
    let id = item.id.clone();
    queue.enqueue(item);

    let resolved = queue
        .resolve(&id, ResolutionStrategy::Merge, None, 10)
        .expect("resolve");
    assert_eq!(resolved, json!({"a": 1, "c": [1, 2, 3]}));
}

#[test]
fn rule_dependent_strategies_degrade_without_rules() {
    let queue = OfflineQueue::new();
    let item = entry(
        "task-1",
        record(json!({"status": "in_progress"}), 0, "app"),
        record(json!({"status": "done"}), 0, "erp"),
    );
    let id = item.id.clone();
    queue.enqueue(item);

    // No rule ever ran for an offline entry: source_priority keeps local.
    let resolved = queue
        .resolve(&id, ResolutionStrategy::SourcePriority, None, 10)
        .expect("resolve");
    assert_eq!(resolved, json!({"status": "in_progress"}));
}

#[test]
fn re_resolving_returns_the_stored_payload() {
    let queue = OfflineQueue::new();
    let item = entry(
        "task-1",
        record(json!({"status": "in_progress"}), 0, "app"),
        record(json!({"status": "done"}), 5_000, "erp"),
    );
    let id = item.id.clone();
    queue.enqueue(item);

    let first = queue
        .resolve(&id, ResolutionStrategy::TimestampWins, None, 10)
        .expect("first resolve");
    let second = queue
        .resolve(&id, ResolutionStrategy::UserDecision, None, 10)
        .expect("second resolve");
    assert_eq!(first, second);
}

#[test]
fn unknown_entry_id_is_a_not_found_error() {
    let queue = OfflineQueue::new();
    let result = queue.resolve("missing", ResolutionStrategy::Merge, None, 10);
    assert!(matches!(
        result,
        Err(EngineError::OfflineResolution(
            OfflineResolutionError::EntryNotFound { .. }
        ))
    ));
}

#[test]
fn engine_exposes_the_offline_queue() {
    let engine = ConflictEngine::new(Arc::new(MemoryStore::new()), EngineConfig::default())
        .expect("engine");

    let item = entry(
        "task-9",
        record(json!({"crew": ["mason"]}), 0, "app"),
        record(json!({"crew": ["welder"]}), 0, "erp"),
    );
    let id = item.id.clone();
    engine.enqueue_offline(item);
    assert_eq!(engine.pending_offline().len(), 1);

    let resolved = engine
        .resolve_offline(&id, ResolutionStrategy::Merge, None)
        .expect("resolve");
    assert_eq!(resolved, json!({"crew": ["mason", "welder"]}));
    assert!(engine.pending_offline().is_empty());
}
