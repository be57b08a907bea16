//! Driving port for swap lifecycle mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::swap::{Rating, SwapDecision, SwapId, SwapView};
use crate::domain::user::UserId;

/// Input for a new swap proposal.
#[derive(Debug, Clone)]
pub struct ProposeSwapRequest {
    pub to_user: UserId,
    pub skill_offered: String,
    pub skill_wanted: String,
}

/// Use-case port covering the swap state machine: propose, respond,
/// cancel, and feedback attachment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapCommand: Send + Sync {
    /// Open a pending swap from `from` towards the request's target.
    async fn propose(&self, from: &UserId, request: ProposeSwapRequest)
        -> Result<SwapView, Error>;

    /// Accept or reject a pending swap. Only the recipient may respond.
    async fn respond(
        &self,
        swap: &SwapId,
        acting: &UserId,
        decision: SwapDecision,
    ) -> Result<SwapView, Error>;

    /// Cancel a pending swap by deleting it. Only the proposer may cancel.
    async fn cancel(&self, swap: &SwapId, acting: &UserId) -> Result<(), Error>;

    /// Upsert the acting participant's feedback on an accepted swap and
    /// append the submission to the audit log.
    async fn attach_feedback(
        &self,
        swap: &SwapId,
        acting: &UserId,
        rating: Rating,
        text: Option<String>,
    ) -> Result<SwapView, Error>;
}
