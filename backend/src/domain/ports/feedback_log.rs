//! Driven port for the append-only feedback audit log.

use async_trait::async_trait;

use crate::domain::swap::FeedbackLogEntry;

/// Persistence errors raised by feedback log adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackLogError {
    /// Append or read failed during execution.
    #[error("feedback log query failed: {message}")]
    Query { message: String },
}

/// Append-only audit trail of every feedback submission, including
/// submissions later replaced on the swap itself. Entries are never
/// mutated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackLog: Send + Sync {
    /// Append one submission record.
    async fn append(&self, entry: &FeedbackLogEntry) -> Result<(), FeedbackLogError>;

    /// All entries in append order.
    async fn entries(&self) -> Result<Vec<FeedbackLogEntry>, FeedbackLogError>;
}
