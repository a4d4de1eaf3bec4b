//! Error taxonomy for the conflict engine.
//!
//! Every public entry point returns [`EngineResult`]; internal failures are
//! caught at the boundary, logged with context, and translated into one of
//! these classes. Listener failures are isolated per listener and never
//! surface here.

mod admin_error;
mod detection_error;
mod offline_error;
mod resolution_error;
mod store_error;

pub use admin_error::AdminError;
pub use detection_error::DetectionError;
pub use offline_error::OfflineResolutionError;
pub use resolution_error::ResolutionError;
pub use store_error::StoreError;

/// Unified error type for every engine entry point.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("conflict detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("conflict resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("offline conflict resolution error: {0}")]
    OfflineResolution(#[from] OfflineResolutionError),

    #[error("administration error: {0}")]
    Admin(#[from] AdminError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used across the workspace.
pub type EngineResult<T> = Result<T, EngineError>;
