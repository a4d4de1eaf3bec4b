use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::conflict::{Conflict, ConflictKind, Severity};

/// Tally of one detection run, by kind, severity, and source. Both the
/// local and the remote source name of every conflict are counted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub total: usize,
    pub by_kind: HashMap<ConflictKind, usize>,
    pub by_severity: HashMap<Severity, usize>,
    pub by_source: HashMap<String, usize>,
}

impl DetectionSummary {
    pub fn record(&mut self, conflict: &Conflict) {
        self.total += 1;
        *self.by_kind.entry(conflict.kind).or_insert(0) += 1;
        *self.by_severity.entry(conflict.severity).or_insert(0) += 1;
        *self
            .by_source
            .entry(conflict.local.source.clone())
            .or_insert(0) += 1;
        *self
            .by_source
            .entry(conflict.remote.source.clone())
            .or_insert(0) += 1;
    }
}

/// The detector's full result: emitted conflicts plus their tally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub conflicts: Vec<Conflict>,
    pub summary: DetectionSummary,
}
