//! Moderation and reporting types used by the admin overlay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::swap::{Rating, SwapId, SwapStatus};
use super::user::UserId;

/// Validation errors raised by moderation value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerationValidationError {
    #[error("message text must not be empty")]
    EmptyMessageText,
}

/// Platform-wide broadcast message.
///
/// Messages are append-only; the most recently created one is the "active"
/// message, there is no explicit deactivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessage {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl AdminMessage {
    /// Create a broadcast message from trimmed, non-empty text.
    pub fn broadcast(text: &str) -> Result<Self, ModerationValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ModerationValidationError::EmptyMessageText);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            created_at: Utc::now(),
        })
    }
}

/// Usage counters computed by full scan at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_swaps: u64,
    pub pending_swaps: u64,
    pub accepted_swaps: u64,
    pub rejected_swaps: u64,
    pub banned_users: u64,
    pub total_feedback: u64,
}

/// User row in the admin export. Mirrors the directory record without the
/// credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportUserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_banned: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Swap row in the admin export, with participant names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSwapRow {
    pub id: SwapId,
    pub from_user: String,
    pub to_user: String,
    pub skill_offered: String,
    pub skill_wanted: String,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
}

/// Feedback-log row in the admin export, with the author name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportFeedbackRow {
    pub swap_id: SwapId,
    pub author: String,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Structured admin export. Row ordering is insertion order per collection;
/// serialisation to CSV or other flat formats belongs to the report sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformReport {
    pub stats: PlatformStats,
    pub users: Vec<ReportUserRow>,
    pub swaps: Vec<ReportSwapRow>,
    pub feedback: Vec<ReportFeedbackRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_trims_text() {
        let message = AdminMessage::broadcast("  maintenance tonight  ").expect("valid message");
        assert_eq!(message.text, "maintenance tonight");
    }

    #[test]
    fn broadcast_rejects_blank_text() {
        assert_eq!(
            AdminMessage::broadcast("   "),
            Err(ModerationValidationError::EmptyMessageText)
        );
    }
}
