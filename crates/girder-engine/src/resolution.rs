//! Strategy application — turning two divergent versions into one value.
//!
//! The resolved payload is always exactly one of: local's data, remote's
//! data, caller-supplied custom data, or the recursive merger's output.
//! Never a partial patch.

use serde_json::Value;

use girder_core::models::rule::{ResolutionRule, ResolutionStrategy};
use girder_core::models::versioned::VersionedRecord;
use girder_merge::merge_values;

/// Compute the resolved payload for a `(local, remote)` pair under a
/// strategy. `rule` is the applicable rule, when one matched; offline
/// entries pass `None` and rule-dependent strategies degrade to their
/// documented fallbacks.
pub fn apply_strategy(
    local: &VersionedRecord,
    remote: &VersionedRecord,
    strategy: ResolutionStrategy,
    custom_data: Option<&Value>,
    rule: Option<&ResolutionRule>,
    merge_max_depth: usize,
) -> Value {
    match strategy {
        ResolutionStrategy::TimestampWins => timestamp_wins(local, remote),
        ResolutionStrategy::SourcePriority => source_priority(local, remote, rule),
        ResolutionStrategy::Merge => match custom_data {
            Some(data) => data.clone(),
            None => merge_values(&local.data, &remote.data, merge_max_depth),
        },
        ResolutionStrategy::UserDecision => match custom_data {
            Some(data) => data.clone(),
            // Documented fallback: an absent operator decision keeps the
            // application's own version.
            None => local.data.clone(),
        },
        ResolutionStrategy::Custom => {
            match rule.and_then(|r| r.resolution.custom_merge.clone()) {
                Some(merge_fn) => merge_fn(&local.data, &remote.data),
                // No callback on the rule (or no rule at all): behave as
                // the plain merge strategy.
                None => match custom_data {
                    Some(data) => data.clone(),
                    None => merge_values(&local.data, &remote.data, merge_max_depth),
                },
            }
        }
    }
}

/// Larger update timestamp wins. An exact tie keeps local; a side without
/// a timestamp loses to one that has one, and two bare sides keep local.
fn timestamp_wins(local: &VersionedRecord, remote: &VersionedRecord) -> Value {
    match (local.timestamp, remote.timestamp) {
        (Some(l), Some(r)) if r > l => remote.data.clone(),
        (None, Some(_)) => remote.data.clone(),
        _ => local.data.clone(),
    }
}

/// First source listed in the rule's priority order that names either side
/// wins. No matching rule, no priority list, or no listed source present
/// keeps local.
fn source_priority(
    local: &VersionedRecord,
    remote: &VersionedRecord,
    rule: Option<&ResolutionRule>,
) -> Value {
    let Some(order) = rule.and_then(|r| r.conditions.source_priority.as_ref()) else {
        return local.data.clone();
    };
    for source in order {
        if *source == local.source {
            return local.data.clone();
        }
        if *source == remote.source {
            return remote.data.clone();
        }
    }
    local.data.clone()
}
