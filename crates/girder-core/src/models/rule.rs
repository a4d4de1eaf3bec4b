//! Operator-authored resolution rules.
//!
//! Rules are read-only during conflict processing. The first active rule
//! matching a conflict in registration order is the applicable rule; there
//! is no scoring or best-match selection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::conflict::ConflictKind;
use super::context::EntityType;

/// Named policy for turning two divergent versions into one resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The side with the larger update timestamp wins; ties keep local.
    TimestampWins,
    /// The rule's source ordering decides.
    SourcePriority,
    /// Structural merge of both trees (or caller-supplied merged data).
    Merge,
    /// A human operator supplies the merged data.
    UserDecision,
    /// The rule's custom merge function decides.
    Custom,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::TimestampWins => "timestamp_wins",
            ResolutionStrategy::SourcePriority => "source_priority",
            ResolutionStrategy::Merge => "merge",
            ResolutionStrategy::UserDecision => "user_decision",
            ResolutionStrategy::Custom => "custom",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized strategy name.
#[derive(Debug, thiserror::Error)]
#[error("unknown resolution strategy {value:?}")]
pub struct UnknownStrategy {
    pub value: String,
}

impl FromStr for ResolutionStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timestamp_wins" => Ok(ResolutionStrategy::TimestampWins),
            "source_priority" => Ok(ResolutionStrategy::SourcePriority),
            "merge" => Ok(ResolutionStrategy::Merge),
            "user_decision" => Ok(ResolutionStrategy::UserDecision),
            "custom" => Ok(ResolutionStrategy::Custom),
            other => Err(UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

/// Merge callback attached to a custom rule.
pub type MergeFn = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Conditions a conflict must meet for a rule to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConditions {
    /// Entity type the rule is scoped to; `None` applies to all.
    pub entity_type: Option<EntityType>,
    pub conflict_kind: ConflictKind,
    /// Source names in winning order, for `source_priority`.
    pub source_priority: Option<Vec<String>>,
    /// Regexes over affected field names; validated when the rule is added.
    pub field_patterns: Option<Vec<String>>,
}

impl RuleConditions {
    /// Conditions matching every conflict of one kind.
    pub fn for_kind(conflict_kind: ConflictKind) -> Self {
        Self {
            entity_type: None,
            conflict_kind,
            source_priority: None,
            field_patterns: None,
        }
    }
}

/// What to do when a rule applies.
///
/// The merge callback is runtime-only state: it is never serialized, and a
/// rule carrying one with any strategy other than `Custom` is rejected at
/// add time so non-custom strategies cannot hold dangling function state.
#[derive(Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub strategy: ResolutionStrategy,
    #[serde(skip)]
    pub custom_merge: Option<MergeFn>,
    pub auto_resolve: bool,
    pub notification_required: bool,
}

impl RuleResolution {
    /// Resolution applying a plain strategy.
    pub fn strategy(strategy: ResolutionStrategy) -> Self {
        Self {
            strategy,
            custom_merge: None,
            auto_resolve: false,
            notification_required: false,
        }
    }

    /// Resolution delegating to a custom merge callback.
    pub fn custom(merge: MergeFn) -> Self {
        Self {
            strategy: ResolutionStrategy::Custom,
            custom_merge: Some(merge),
            auto_resolve: false,
            notification_required: false,
        }
    }
}

impl fmt::Debug for RuleResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleResolution")
            .field("strategy", &self.strategy)
            .field("custom_merge", &self.custom_merge.as_ref().map(|_| "<merge fn>"))
            .field("auto_resolve", &self.auto_resolve)
            .field("notification_required", &self.notification_required)
            .finish()
    }
}

/// An operator-authored resolution rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub conditions: RuleConditions,
    pub resolution: RuleResolution,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResolutionRule {
    /// New active rule with fresh timestamps.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        conditions: RuleConditions,
        resolution: RuleResolution,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            conditions,
            resolution,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
