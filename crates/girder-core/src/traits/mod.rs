pub mod listener;
pub mod store;
pub mod writeback;

pub use listener::IConflictListener;
pub use store::{ConflictFilter, IConflictStore};
pub use writeback::{IWritebackSink, NoOpSink, WritebackError};
