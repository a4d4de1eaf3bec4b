/// Errors from resolving entries of the offline conflict log.
#[derive(Debug, thiserror::Error)]
pub enum OfflineResolutionError {
    #[error("offline conflict {id} not found")]
    EntryNotFound { id: String },
}
