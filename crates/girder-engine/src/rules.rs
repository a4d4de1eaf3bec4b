//! Rule registry — ordered resolution rules matched against conflicts.
//!
//! First active rule matching a conflict in registration order applies; no
//! scoring or best-match selection. When two rules could match the same
//! conflict, insertion order decides.

use std::sync::RwLock;

use regex::Regex;
use tracing::info;

use girder_core::errors::AdminError;
use girder_core::models::conflict::Conflict;
use girder_core::models::rule::{ResolutionRule, ResolutionStrategy};

/// In-memory, registration-ordered rule set. Read-mostly; writers hold the
/// lock only for the add/remove/activate critical section.
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<Vec<ResolutionRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a rule.
    ///
    /// Rejected: duplicate id, non-compiling field pattern, or a custom
    /// merge callback on a non-custom strategy.
    pub fn add(&self, rule: ResolutionRule) -> Result<(), AdminError> {
        if rule.resolution.custom_merge.is_some()
            && rule.resolution.strategy != ResolutionStrategy::Custom
        {
            return Err(AdminError::RuleRejected {
                id: rule.id.clone(),
                reason: format!(
                    "custom merge callback requires the custom strategy, got {}",
                    rule.resolution.strategy
                ),
            });
        }
        if let Some(patterns) = &rule.conditions.field_patterns {
            for pattern in patterns {
                if let Err(error) = Regex::new(pattern) {
                    return Err(AdminError::RuleRejected {
                        id: rule.id.clone(),
                        reason: format!("field pattern {pattern:?} does not compile: {error}"),
                    });
                }
            }
        }

        let mut rules = self.rules.write().expect("rule lock poisoned");
        if rules.iter().any(|existing| existing.id == rule.id) {
            return Err(AdminError::RuleRejected {
                id: rule.id.clone(),
                reason: "a rule with this id is already registered".to_string(),
            });
        }
        info!(rule_id = %rule.id, name = %rule.name, "resolution rule registered");
        rules.push(rule);
        Ok(())
    }

    /// Remove a rule. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let mut rules = self.rules.write().expect("rule lock poisoned");
        let before = rules.len();
        rules.retain(|rule| rule.id != id);
        let removed = rules.len() != before;
        if removed {
            info!(rule_id = %id, "resolution rule removed");
        }
        removed
    }

    /// Toggle a rule without losing its registration slot. Returns the
    /// updated rule for write-through persistence.
    pub fn set_active(&self, id: &str, active: bool) -> Option<ResolutionRule> {
        let mut rules = self.rules.write().expect("rule lock poisoned");
        let rule = rules.iter_mut().find(|rule| rule.id == id)?;
        rule.active = active;
        rule.updated_at = chrono::Utc::now();
        info!(rule_id = %id, active, "resolution rule toggled");
        Some(rule.clone())
    }

    pub fn list(&self) -> Vec<ResolutionRule> {
        self.rules.read().expect("rule lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.rules.read().expect("rule lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First active rule whose conditions accept the conflict: the entity
    /// type matches when the rule sets one, and the conflict kind matches.
    pub fn find_applicable(&self, conflict: &Conflict) -> Option<ResolutionRule> {
        let rules = self.rules.read().expect("rule lock poisoned");
        rules
            .iter()
            .find(|rule| rule.active && rule_matches(rule, conflict))
            .cloned()
    }
}

fn rule_matches(rule: &ResolutionRule, conflict: &Conflict) -> bool {
    if let Some(entity_type) = rule.conditions.entity_type {
        if entity_type != conflict.entity_type {
            return false;
        }
    }
    rule.conditions.conflict_kind == conflict.kind
}
