//! Engine configuration.
//!
//! # Examples
//!
//! ```
//! use girder_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.merge_max_depth, 10);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MERGE_MAX_DEPTH, DEFAULT_RETENTION_DAYS};
use crate::errors::AdminError;
use crate::models::rule::ResolutionStrategy;

/// Engine-wide tuning knobs. One instance per engine, hot-swappable via
/// `update_config`; concurrent calls read whatever snapshot is current
/// (last writer wins, no cross-call transactional isolation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Strategy proposed when no rule matches. Default: timestamp_wins.
    pub default_strategy: ResolutionStrategy,
    /// Severity score at or below which a rule may auto-resolve (0–100).
    /// Default: 50.
    pub auto_resolve_severity_threshold: u8,
    /// Severity score at or above which detection logs an operator alert
    /// (0–100). Default: 75.
    pub notification_severity_threshold: u8,
    /// Recursion bound for the structural merger. Default: 10.
    pub merge_max_depth: usize,
    /// Days a terminal conflict is retained before cleanup. Default: 30.
    pub conflict_retention_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_strategy: ResolutionStrategy::TimestampWins,
            auto_resolve_severity_threshold: 50,
            notification_severity_threshold: 75,
            merge_max_depth: DEFAULT_MERGE_MAX_DEPTH,
            conflict_retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl EngineConfig {
    /// Check bounds before a config swap.
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.auto_resolve_severity_threshold > 100 {
            return Err(AdminError::ConfigRejected {
                reason: format!(
                    "auto_resolve_severity_threshold {} exceeds 100",
                    self.auto_resolve_severity_threshold
                ),
            });
        }
        if self.notification_severity_threshold > 100 {
            return Err(AdminError::ConfigRejected {
                reason: format!(
                    "notification_severity_threshold {} exceeds 100",
                    self.notification_severity_threshold
                ),
            });
        }
        if self.merge_max_depth == 0 {
            return Err(AdminError::ConfigRejected {
                reason: "merge_max_depth must be at least 1".to_string(),
            });
        }
        if self.conflict_retention_days == 0 {
            return Err(AdminError::ConfigRejected {
                reason: "conflict_retention_days must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
