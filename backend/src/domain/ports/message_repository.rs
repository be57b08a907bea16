//! Driven port for the admin broadcast message history.

use async_trait::async_trait;

use crate::domain::moderation::AdminMessage;

/// Persistence errors raised by admin message adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagePersistenceError {
    /// Append or read failed during execution.
    #[error("message store query failed: {message}")]
    Query { message: String },
}

/// Append-only history of platform broadcast messages. Superseding
/// insertion order is the only deactivation mechanism.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminMessageRepository: Send + Sync {
    /// Append one broadcast message.
    async fn append(&self, message: &AdminMessage) -> Result<(), MessagePersistenceError>;

    /// All messages, newest first.
    async fn list_newest_first(&self) -> Result<Vec<AdminMessage>, MessagePersistenceError>;

    /// The most recently created message, if any.
    async fn latest(&self) -> Result<Option<AdminMessage>, MessagePersistenceError>;
}
