//! Driven port for swap persistence adapters.

use async_trait::async_trait;

use crate::domain::swap::{Swap, SwapId};
use crate::domain::user::UserId;

/// Persistence errors raised by swap repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapPersistenceError {
    /// Query or mutation failed during execution.
    #[error("swap store query failed: {message}")]
    Query { message: String },
    /// Insert collided with the one-active-swap-per-pair constraint.
    #[error("an active swap already exists between {first} and {second}")]
    ActivePairExists { first: String, second: String },
    /// Update targeted a swap that is not in the store.
    #[error("swap {id} is not in the store")]
    Missing { id: String },
}

/// Store for swap records.
///
/// `insert_pending` is the serialisation point for the pair-uniqueness
/// invariant: adapters must hold the check and the insert inside one
/// critical section (or a store-level uniqueness constraint) so two
/// concurrent proposals for the same pair cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapRepository: Send + Sync {
    /// Insert a new pending swap, failing with
    /// [`SwapPersistenceError::ActivePairExists`] when the unordered pair
    /// already has a pending or accepted swap.
    async fn insert_pending(&self, swap: &Swap) -> Result<(), SwapPersistenceError>;

    /// Fetch a swap by identifier.
    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError>;

    /// Replace an existing swap record.
    async fn update(&self, swap: &Swap) -> Result<(), SwapPersistenceError>;

    /// Delete a swap permanently. Returns whether a record was removed.
    async fn delete(&self, id: &SwapId) -> Result<bool, SwapPersistenceError>;

    /// The pending or accepted swap between the unordered pair, if any.
    async fn find_active_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Swap>, SwapPersistenceError>;

    /// All swaps where the user is either party, in insertion order.
    async fn list_involving(&self, user: &UserId) -> Result<Vec<Swap>, SwapPersistenceError>;

    /// All swaps in insertion order.
    async fn list_all(&self) -> Result<Vec<Swap>, SwapPersistenceError>;
}
