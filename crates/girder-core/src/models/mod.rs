pub mod conflict;
pub mod context;
pub mod offline;
pub mod rule;
pub mod statistics;
pub mod summary;
pub mod versioned;

pub use conflict::{
    Conflict, ConflictKind, ConflictMetadata, ConflictStatus, DetectionMethod, Severity,
};
pub use context::{DetectionContext, EntityType};
pub use offline::{OfflineConflict, OfflineStatus};
pub use rule::{MergeFn, ResolutionRule, ResolutionStrategy, RuleConditions, RuleResolution};
pub use statistics::ConflictStatistics;
pub use summary::{DetectionOutcome, DetectionSummary};
pub use versioned::VersionedRecord;
