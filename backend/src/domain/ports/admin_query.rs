//! Driving port for admin reads and reporting.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::moderation::{AdminMessage, PlatformReport, PlatformStats};
use crate::domain::user::{AccountView, UserId};

/// Use-case port for broadcast history and usage reporting. Message reads
/// are public; stats, report, and the user listing require the admin flag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminQuery: Send + Sync {
    /// The currently active broadcast message, if any.
    async fn latest_message(&self) -> Result<Option<AdminMessage>, Error>;

    /// Broadcast history, newest first.
    async fn messages(&self) -> Result<Vec<AdminMessage>, Error>;

    /// Full-scan usage counters.
    async fn stats(&self, acting: &UserId) -> Result<PlatformStats, Error>;

    /// Structured export of users, swaps, and feedback entries.
    async fn report(&self, acting: &UserId) -> Result<PlatformReport, Error>;

    /// Every account in the directory, including banned and private ones.
    async fn list_users(&self, acting: &UserId) -> Result<Vec<AccountView>, Error>;
}
