//! Detection pass tests: timestamp check, field check, severity fixing,
//! and summary tallies.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use girder_core::models::conflict::{ConflictKind, Severity};
use girder_core::models::context::{DetectionContext, EntityType};
use girder_core::models::rule::ResolutionStrategy;
use girder_core::models::versioned::VersionedRecord;
use girder_engine::ConflictDetector;

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

fn task_context() -> DetectionContext {
    DetectionContext::new(EntityType::Task, "task-42")
}

fn detect(
    local: &VersionedRecord,
    remote: &VersionedRecord,
) -> girder_core::models::summary::DetectionOutcome {
    ConflictDetector::detect(local, remote, &task_context(), ResolutionStrategy::TimestampWins)
        .expect("detection succeeds")
}

#[test]
fn agreeing_snapshots_within_tolerance_yield_nothing() {
    let local = record(json!({"name": "Framing", "status": "in_progress"}), 0, "app");
    let remote = record(json!({"name": "Framing", "status": "in_progress"}), 500, "erp");

    let outcome = detect(&local, &remote);
    assert!(outcome.conflicts.is_empty());
    assert_eq!(outcome.summary.total, 0);
}

#[test]
fn field_divergence_emits_one_data_version_conflict() {
    let local = record(json!({"name": "Framing", "status": "in_progress"}), 0, "app");
    let remote = record(json!({"name": "Framing", "status": "done"}), 200, "erp");

    let outcome = detect(&local, &remote);
    assert_eq!(outcome.conflicts.len(), 1);

    let conflict = &outcome.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::DataVersion);
    assert_eq!(conflict.severity, Severity::Low);
    assert_eq!(
        conflict.metadata.affected_fields.as_deref(),
        Some(&["status".to_string()][..])
    );
}

#[test]
fn field_count_drives_severity() {
    let cases = [
        (1, Severity::Low),
        (2, Severity::Low),
        (3, Severity::Medium),
        (5, Severity::Medium),
        (6, Severity::High),
        (9, Severity::High),
    ];
    for (count, expected) in cases {
        let mut local = serde_json::Map::new();
        let mut remote = serde_json::Map::new();
        for i in 0..count {
            local.insert(format!("field_{i}"), json!("local"));
            remote.insert(format!("field_{i}"), json!("remote"));
        }
        let local = record(Value::Object(local), 0, "app");
        let remote = record(Value::Object(remote), 0, "erp");

        let outcome = detect(&local, &remote);
        assert_eq!(outcome.conflicts.len(), 1, "{count} fields");
        let conflict = &outcome.conflicts[0];
        assert_eq!(
            conflict.metadata.affected_fields.as_ref().map(Vec::len),
            Some(count)
        );
        assert_eq!(conflict.severity, expected, "{count} fields");
    }
}

#[test]
fn bookkeeping_only_divergence_yields_nothing() {
    let local = record(json!({"id": "a", "updatedAt": "x", "name": "Framing"}), 0, "app");
    let remote = record(json!({"id": "b", "updatedAt": "y", "name": "Framing"}), 0, "erp");

    let outcome = detect(&local, &remote);
    assert!(outcome.conflicts.is_empty());
}

#[test]
fn wide_timestamp_gap_emits_high_severity_concurrent_modification() {
    let local = record(json!({"status": "in_progress"}), 0, "app");
    let remote = record(json!({"status": "done"}), 40_000, "erp");

    let outcome = detect(&local, &remote);
    assert_eq!(outcome.conflicts.len(), 1);

    let conflict = &outcome.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::ConcurrentModification);
    assert_eq!(conflict.severity, Severity::High);
}

#[test]
fn moderate_timestamp_gap_is_medium_severity() {
    let local = record(json!({"status": "in_progress"}), 0, "app");
    let remote = record(json!({"status": "in_progress"}), 5_000, "erp");

    let outcome = detect(&local, &remote);
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].kind, ConflictKind::ConcurrentModification);
    assert_eq!(outcome.conflicts[0].severity, Severity::Medium);
}

#[test]
fn missing_timestamps_fall_through_to_the_field_check() {
    let local = VersionedRecord::new(json!({"status": "in_progress"}), None, "app");
    let remote = VersionedRecord::new(json!({"status": "done"}), None, "erp");

    let outcome = detect(&local, &remote);
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].kind, ConflictKind::DataVersion);
}

#[test]
fn summary_counts_both_source_names() {
    let local = record(json!({"status": "in_progress"}), 0, "app");
    let remote = record(json!({"status": "done"}), 40_000, "erp");

    let outcome = detect(&local, &remote);
    assert_eq!(outcome.summary.total, 1);
    assert_eq!(outcome.summary.by_source.get("app"), Some(&1));
    assert_eq!(outcome.summary.by_source.get("erp"), Some(&1));
    assert_eq!(
        outcome.summary.by_kind.get(&ConflictKind::ConcurrentModification),
        Some(&1)
    );
    assert_eq!(outcome.summary.by_severity.get(&Severity::High), Some(&1));
}

#[test]
fn non_object_snapshot_is_a_detection_error() {
    let local = record(json!("not an object"), 0, "app");
    let remote = record(json!({"status": "done"}), 0, "erp");

    let result = ConflictDetector::detect(
        &local,
        &remote,
        &task_context(),
        ResolutionStrategy::TimestampWins,
    );
    assert!(result.is_err());
}
