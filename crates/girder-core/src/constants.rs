/// Girder system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timestamp gap below which two writes count as the same edit (ms).
pub const CONCURRENT_EDIT_TOLERANCE_MS: i64 = 1_000;

/// Timestamp gap above which a concurrent modification is high severity (ms).
pub const HIGH_SEVERITY_GAP_MS: i64 = 30_000;

/// Bookkeeping fields excluded from field diffing. Connector payloads
/// arrive camelCased, internal records snake_cased; both spellings are
/// skipped.
pub const BOOKKEEPING_FIELDS: [&str; 5] =
    ["id", "created_at", "createdAt", "updated_at", "updatedAt"];

/// Default recursion bound for the structural merger.
pub const DEFAULT_MERGE_MAX_DEPTH: usize = 10;

/// Default retention window for terminal conflicts (days).
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Identity recorded on automatically resolved conflicts.
pub const SYSTEM_RESOLVER: &str = "system";
