//! Driving port for user directory reads.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{AccountView, UserId, UserProfile};

/// Use-case port for browsing and fetching directory records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Public, non-banned users in insertion order. An optional search term
    /// filters case-insensitively over name, location, and both skill
    /// lists.
    async fn find_public_users<'a>(
        &self,
        search: Option<&'a str>,
    ) -> Result<Vec<UserProfile>, Error>;

    /// The account view for an authenticated user.
    async fn fetch_account(&self, id: &UserId) -> Result<AccountView, Error>;
}
