/// Detection-input errors. A malformed pair is surfaced to the caller and
/// never becomes a Conflict record.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("malformed detection input for {entity_id}: {reason}")]
    MalformedInput { entity_id: String, reason: String },

    #[error("non-serializable snapshot from {origin}: {reason}")]
    NonSerializable { origin: String, reason: String },
}
