/// Resolution and write-back errors.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("conflict {id} not found")]
    ConflictNotFound { id: String },

    #[error("conflict {id} is {status} and permits no further transition")]
    TerminalState { id: String, status: String },

    #[error("write-back to connector {connector} failed: {reason}")]
    WritebackFailed { connector: String, reason: String },
}
