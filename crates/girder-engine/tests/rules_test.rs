//! Rule registry tests: validation, first-match lookup, lifecycle.

use std::sync::Arc;

use serde_json::json;

use girder_core::models::conflict::{
    Conflict, ConflictKind, ConflictMetadata, DetectionMethod, Severity,
};
use girder_core::models::context::{DetectionContext, EntityType};
use girder_core::models::rule::{
    ResolutionRule, ResolutionStrategy, RuleConditions, RuleResolution,
};
use girder_core::models::versioned::VersionedRecord;
use girder_engine::RuleRegistry;

fn conflict_of(kind: ConflictKind, entity_type: EntityType) -> Conflict {
    let context = DetectionContext::new(entity_type, "entity-1");
    Conflict::new(
        kind,
        &context,
        VersionedRecord::new(json!({"a": 1}), None, "app"),
        VersionedRecord::new(json!({"a": 2}), None, "erp"),
        ResolutionStrategy::TimestampWins,
        Severity::Low,
        ConflictMetadata {
            detection_method: DetectionMethod::Automatic,
            affected_fields: None,
            details: None,
        },
    )
}

fn rule(id: &str, kind: ConflictKind) -> ResolutionRule {
    ResolutionRule::new(
        id,
        format!("rule {id}"),
        RuleConditions::for_kind(kind),
        RuleResolution::strategy(ResolutionStrategy::Merge),
    )
}

#[test]
fn first_match_in_registration_order_wins() {
    let registry = RuleRegistry::new();
    registry.add(rule("first", ConflictKind::DataVersion)).expect("add");
    registry.add(rule("second", ConflictKind::DataVersion)).expect("add");

    let found = registry
        .find_applicable(&conflict_of(ConflictKind::DataVersion, EntityType::Task))
        .expect("a rule matches");
    assert_eq!(found.id, "first");
}

#[test]
fn inactive_rules_are_skipped() {
    let registry = RuleRegistry::new();
    registry.add(rule("first", ConflictKind::DataVersion)).expect("add");
    registry.add(rule("second", ConflictKind::DataVersion)).expect("add");
    registry.set_active("first", false).expect("rule exists");

    let found = registry
        .find_applicable(&conflict_of(ConflictKind::DataVersion, EntityType::Task))
        .expect("a rule matches");
    assert_eq!(found.id, "second");
}

#[test]
fn kind_mismatch_never_matches() {
    let registry = RuleRegistry::new();
    registry.add(rule("only", ConflictKind::SchemaMismatch)).expect("add");

    assert!(registry
        .find_applicable(&conflict_of(ConflictKind::DataVersion, EntityType::Task))
        .is_none());
}

#[test]
fn entity_type_scoping_narrows_the_match() {
    let registry = RuleRegistry::new();
    let mut scoped = rule("projects-only", ConflictKind::DataVersion);
    scoped.conditions.entity_type = Some(EntityType::Project);
    registry.add(scoped).expect("add");

    assert!(registry
        .find_applicable(&conflict_of(ConflictKind::DataVersion, EntityType::Task))
        .is_none());
    assert!(registry
        .find_applicable(&conflict_of(ConflictKind::DataVersion, EntityType::Project))
        .is_some());
}

#[test]
fn unscoped_rule_applies_to_every_entity_type() {
    let registry = RuleRegistry::new();
    registry.add(rule("any", ConflictKind::DataVersion)).expect("add");

    for entity_type in [EntityType::Project, EntityType::Task, EntityType::Resource] {
        assert!(registry
            .find_applicable(&conflict_of(ConflictKind::DataVersion, entity_type))
            .is_some());
    }
}

#[test]
fn duplicate_rule_id_is_rejected() {
    let registry = RuleRegistry::new();
    registry.add(rule("dup", ConflictKind::DataVersion)).expect("add");
    assert!(registry.add(rule("dup", ConflictKind::DataVersion)).is_err());
    assert_eq!(registry.len(), 1);
}

#[test]
fn non_compiling_field_pattern_is_rejected() {
    let registry = RuleRegistry::new();
    let mut bad = rule("bad-pattern", ConflictKind::DataVersion);
    bad.conditions.field_patterns = Some(vec!["status|".to_string(), "[unclosed".to_string()]);
    assert!(registry.add(bad).is_err());
    assert!(registry.is_empty());
}

#[test]
fn custom_callback_on_a_non_custom_strategy_is_rejected() {
    let registry = RuleRegistry::new();
    let mut dangling = rule("dangling", ConflictKind::DataVersion);
    dangling.resolution.custom_merge = Some(Arc::new(|local, _| local.clone()));
    // Strategy is Merge, not Custom: the callback would be dangling state.
    assert!(registry.add(dangling).is_err());
}

#[test]
fn removal_frees_the_id_for_re_registration() {
    let registry = RuleRegistry::new();
    registry.add(rule("transient", ConflictKind::DataVersion)).expect("add");
    assert!(registry.remove("transient"));
    assert!(!registry.remove("transient"));
    registry.add(rule("transient", ConflictKind::DataVersion)).expect("re-add");
}
