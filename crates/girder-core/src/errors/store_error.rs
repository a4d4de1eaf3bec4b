/// Persistence-collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {key} not found")]
    NotFound { key: String },

    #[error("record {key} already exists")]
    Duplicate { key: String },

    #[error("storage backend error: {message}")]
    Backend { message: String },
}
