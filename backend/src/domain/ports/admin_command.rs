//! Driving port for moderation actions.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::moderation::AdminMessage;
use crate::domain::user::{SkillListKind, UserId};

/// Use-case port for elevated moderation actions. Every operation checks
/// that the acting user holds the admin flag and fails with `Forbidden`
/// otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Append a platform-wide broadcast message.
    async fn broadcast(&self, acting: &UserId, text: &str) -> Result<AdminMessage, Error>;

    /// Ban a user, hiding them from the public directory. Idempotent.
    async fn ban_user(&self, acting: &UserId, target: &UserId) -> Result<(), Error>;

    /// Redact one skill entry on a user's listing.
    async fn redact_skill(
        &self,
        acting: &UserId,
        target: &UserId,
        kind: SkillListKind,
        skill: &str,
    ) -> Result<(), Error>;
}
