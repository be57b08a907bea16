//! Driving port for swap views.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::swap::SwapBoard;
use crate::domain::user::UserId;

/// Use-case port for the my-swaps board.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapQuery: Send + Sync {
    /// Partition the user's swaps into incoming, outgoing, and accepted.
    /// Rejected swaps are silently archived and appear in none of the
    /// views.
    async fn list_for_user(&self, user: &UserId) -> Result<SwapBoard, Error>;
}
