use serde_json::Value;

use crate::models::conflict::Conflict;

/// Failure reported by a write-back sink.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct WritebackError {
    pub message: String,
}

/// Connector-side write-through surface: receives the resolved payload so
/// the connector can push it to both systems.
pub trait IWritebackSink: Send + Sync {
    /// Connector name, used in audit events and error context.
    fn name(&self) -> &str;

    fn write_back(&self, conflict: &Conflict, resolved: &Value) -> Result<(), WritebackError>;
}

/// Sink that accepts and discards every payload. Useful in tests and for
/// connectors that poll instead of receiving pushes.
#[derive(Debug, Default)]
pub struct NoOpSink;

impl IWritebackSink for NoOpSink {
    fn name(&self) -> &str {
        "noop"
    }

    fn write_back(&self, _conflict: &Conflict, _resolved: &Value) -> Result<(), WritebackError> {
        Ok(())
    }
}
