/// Administration-surface errors: rule management, config swaps,
/// statistics, retention cleanup.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("rule {id} rejected: {reason}")]
    RuleRejected { id: String, reason: String },

    #[error("config update rejected: {reason}")]
    ConfigRejected { reason: String },

    #[error("statistics aggregation failed: {reason}")]
    StatisticsFailed { reason: String },

    #[error("cleanup failed after removing {removed} conflicts: {reason}")]
    CleanupFailed { removed: usize, reason: String },
}
