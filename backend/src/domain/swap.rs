//! Swap lifecycle data model.
//!
//! A swap is a one-for-one exchange of skills between two users. It is
//! created pending, the recipient accepts or rejects it, and the proposer
//! may cancel it while pending. Cancellation deletes the record, so no
//! `cancelled` status is ever stored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::{ParticipantSummary, UserId};

/// Validation errors raised by swap value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapValidationError {
    #[error("rating must be between {min} and {max}", min = Rating::MIN, max = Rating::MAX)]
    RatingOutOfRange,
}

/// Stable swap identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct SwapId(Uuid);

impl SwapId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SwapId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored swap status. `pending` and `accepted` are the two "active"
/// states for the per-pair uniqueness rule; `rejected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SwapStatus {
    /// Active swaps block new proposals between the same pair of users.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Decision the recipient takes on a pending swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SwapDecision {
    Accepted,
    Rejected,
}

impl From<SwapDecision> for SwapStatus {
    fn from(value: SwapDecision) -> Self {
        match value {
            SwapDecision::Accepted => Self::Accepted,
            SwapDecision::Rejected => Self::Rejected,
        }
    }
}

/// Star rating attached to feedback, an integer from 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate and construct a [`Rating`].
    pub fn new(value: u8) -> Result<Self, SwapValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SwapValidationError::RatingOutOfRange)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = SwapValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// The current feedback entry a participant has on a swap.
///
/// At most one entry per participant lives on the swap itself; resubmission
/// replaces it. The append-only audit trail is [`FeedbackLogEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub author: UserId,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// Create a feedback entry timestamped now.
    pub fn new(author: UserId, rating: Rating, text: Option<String>) -> Self {
        Self {
            author,
            rating,
            text,
            submitted_at: Utc::now(),
        }
    }
}

/// Immutable audit record of a feedback submission, including submissions
/// that later got replaced on the swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackLogEntry {
    pub swap_id: SwapId,
    pub author: UserId,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackLogEntry {
    /// Build the audit record for a feedback submission.
    pub fn record(swap_id: SwapId, feedback: &Feedback) -> Self {
        Self {
            swap_id,
            author: feedback.author,
            rating: feedback.rating,
            text: feedback.text.clone(),
            recorded_at: feedback.submitted_at,
        }
    }
}

/// A proposed or realised exchange of one skill for another.
///
/// ## Invariants
/// - `from_user != to_user`.
/// - `feedback` holds at most one entry per participant (upsert by author).
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    id: SwapId,
    from_user: UserId,
    to_user: UserId,
    skill_offered: String,
    skill_wanted: String,
    status: SwapStatus,
    feedback: Vec<Feedback>,
    created_at: DateTime<Utc>,
}

impl Swap {
    /// Create a new pending swap. Skill membership is validated by the
    /// matcher before this is called.
    pub fn propose(
        from_user: UserId,
        to_user: UserId,
        skill_offered: String,
        skill_wanted: String,
    ) -> Self {
        Self {
            id: SwapId::random(),
            from_user,
            to_user,
            skill_offered,
            skill_wanted,
            status: SwapStatus::Pending,
            feedback: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SwapId {
        &self.id
    }

    pub fn from_user(&self) -> &UserId {
        &self.from_user
    }

    pub fn to_user(&self) -> &UserId {
        &self.to_user
    }

    pub fn skill_offered(&self) -> &str {
        &self.skill_offered
    }

    pub fn skill_wanted(&self) -> &str {
        &self.skill_wanted
    }

    pub fn status(&self) -> SwapStatus {
        self.status
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when `user` is either participant.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from_user == user || &self.to_user == user
    }

    /// True when this swap links the unordered pair `{a, b}`.
    pub fn links(&self, a: &UserId, b: &UserId) -> bool {
        (&self.from_user == a && &self.to_user == b)
            || (&self.from_user == b && &self.to_user == a)
    }

    /// True while the swap blocks new proposals between its pair.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Record the recipient's decision. Caller enforces that the swap is
    /// pending and the actor is the recipient.
    pub fn decide(&mut self, decision: SwapDecision) {
        self.status = decision.into();
    }

    /// Insert or replace the feedback entry keyed by its author. Returns
    /// `true` when a previous entry was replaced.
    pub fn upsert_feedback(&mut self, entry: Feedback) -> bool {
        match self
            .feedback
            .iter_mut()
            .find(|existing| existing.author == entry.author)
        {
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.feedback.push(entry);
                false
            }
        }
    }

    /// Resolve the swap into its display projection.
    pub fn view(&self, from: ParticipantSummary, to: ParticipantSummary) -> SwapView {
        SwapView {
            id: self.id,
            from_user: from,
            to_user: to,
            skill_offered: self.skill_offered.clone(),
            skill_wanted: self.skill_wanted.clone(),
            status: self.status,
            feedback: self.feedback.clone(),
            created_at: self.created_at,
        }
    }
}

/// Display projection of a swap with both participants resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapView {
    pub id: SwapId,
    pub from_user: ParticipantSummary,
    pub to_user: ParticipantSummary,
    pub skill_offered: String,
    pub skill_wanted: String,
    pub status: SwapStatus,
    pub feedback: Vec<Feedback>,
    pub created_at: DateTime<Utc>,
}

/// The three disjoint views returned by the my-swaps query. Rejected swaps
/// appear in none of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapBoard {
    pub incoming: Vec<SwapView>,
    pub outgoing: Vec<SwapView>,
    pub accepted: Vec<SwapView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_swap() -> Swap {
        Swap::propose(
            UserId::random(),
            UserId::random(),
            "Cooking".into(),
            "Programming".into(),
        )
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    fn rating_range(#[case] value: u8, #[case] ok: bool) {
        assert_eq!(Rating::new(value).is_ok(), ok);
    }

    #[test]
    fn proposal_starts_pending() {
        let swap = sample_swap();
        assert_eq!(swap.status(), SwapStatus::Pending);
        assert!(swap.is_active());
        assert!(swap.feedback().is_empty());
    }

    #[test]
    fn rejection_deactivates_the_pair() {
        let mut swap = sample_swap();
        swap.decide(SwapDecision::Rejected);
        assert_eq!(swap.status(), SwapStatus::Rejected);
        assert!(!swap.is_active());
    }

    #[test]
    fn links_is_direction_agnostic() {
        let swap = sample_swap();
        let (a, b) = (*swap.from_user(), *swap.to_user());
        assert!(swap.links(&a, &b));
        assert!(swap.links(&b, &a));
        assert!(!swap.links(&a, &UserId::random()));
    }

    #[test]
    fn feedback_upsert_replaces_by_author() {
        let mut swap = sample_swap();
        let author = *swap.from_user();
        let rating = |v| Rating::new(v).expect("valid rating");

        let replaced = swap.upsert_feedback(Feedback::new(author, rating(5), Some("Great!".into())));
        assert!(!replaced);
        assert_eq!(swap.feedback().len(), 1);

        let replaced = swap.upsert_feedback(Feedback::new(author, rating(4), None));
        assert!(replaced);
        assert_eq!(swap.feedback().len(), 1);
        assert_eq!(swap.feedback()[0].rating.value(), 4);

        // A second author gets their own slot.
        let other = *swap.to_user();
        swap.upsert_feedback(Feedback::new(other, rating(3), None));
        assert_eq!(swap.feedback().len(), 2);
    }

    #[test]
    fn rating_rejects_out_of_range_during_deserialisation() {
        let parsed: Result<Rating, _> = serde_json::from_str("9");
        assert!(parsed.is_err());
    }
}
