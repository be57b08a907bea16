//! Driven port for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },
    /// Insert collided with the unique-email constraint.
    #[error("a user with email {email} already exists")]
    DuplicateEmail { email: String },
    /// Update targeted a user that is not in the store.
    #[error("user {id} is not in the store")]
    Missing { id: String },
}

/// Store for user records. Listing preserves insertion order; the email
/// index is unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with
    /// [`UserPersistenceError::DuplicateEmail`] when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace an existing user record.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by their unique email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// All users in insertion order.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}
