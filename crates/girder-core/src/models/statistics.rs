use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Read-only aggregation over stored conflicts, for the administration
/// surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictStatistics {
    pub total: usize,
    pub resolved: usize,
    /// Conflicts still in `detected`.
    pub pending: usize,
    pub ignored: usize,
    /// Resolved with `resolved_by = "system"`.
    pub auto_resolved: usize,
    pub manually_resolved: usize,
    /// Resolved conflict counts keyed by applied strategy name.
    pub by_strategy: HashMap<String, usize>,
}
