//! Admin overlay service.
//!
//! Wraps the moderation primitives with an admin-flag gate and adds
//! broadcast messaging, usage counters, and the structured report export.
//! Stats and report are full scans computed at request time; nothing is
//! cached or incrementally maintained.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::directory_service::DirectoryService;
use crate::domain::error::Error;
use crate::domain::moderation::{
    AdminMessage, PlatformReport, PlatformStats, ReportFeedbackRow, ReportSwapRow, ReportUserRow,
};
use crate::domain::ports::{
    AdminCommand, AdminMessageRepository, AdminQuery, FeedbackLog, FeedbackLogError,
    MessagePersistenceError, SwapPersistenceError, SwapRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::swap::SwapStatus;
use crate::domain::user::{AccountView, SkillListKind, User, UserId};

/// Admin service implementing the moderation and reporting driving ports.
#[derive(Clone)]
pub struct AdminService<U, S, F, M> {
    users: Arc<U>,
    swaps: Arc<S>,
    feedback_log: Arc<F>,
    messages: Arc<M>,
    directory: DirectoryService<U>,
}

impl<U, S, F, M> AdminService<U, S, F, M> {
    /// Create a new service over the given stores. Ban and redact delegate
    /// to a directory service built over the same user repository.
    pub fn new(users: Arc<U>, swaps: Arc<S>, feedback_log: Arc<F>, messages: Arc<M>) -> Self {
        let directory = DirectoryService::new(users.clone());
        Self {
            users,
            swaps,
            feedback_log,
            messages,
            directory,
        }
    }
}

fn map_user_store_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("user store error: {error}"))
}

fn map_swap_store_error(error: SwapPersistenceError) -> Error {
    Error::internal(format!("swap store error: {error}"))
}

fn map_log_error(error: FeedbackLogError) -> Error {
    Error::internal(format!("feedback log error: {error}"))
}

fn map_message_store_error(error: MessagePersistenceError) -> Error {
    Error::internal(format!("message store error: {error}"))
}

fn display_name_for(users: &HashMap<UserId, &User>, id: &UserId) -> String {
    users
        .get(id)
        .map_or_else(|| "unknown user".to_owned(), |user| {
            user.name().as_ref().to_owned()
        })
}

impl<U, S, F, M> AdminService<U, S, F, M>
where
    U: UserRepository,
    S: SwapRepository,
    F: FeedbackLog,
    M: AdminMessageRepository,
{
    async fn require_admin(&self, acting: &UserId) -> Result<(), Error> {
        let user = self
            .users
            .find_by_id(acting)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        if !user.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(())
    }

    async fn compute_report(&self) -> Result<PlatformReport, Error> {
        let users = self.users.list_all().await.map_err(map_user_store_error)?;
        let swaps = self.swaps.list_all().await.map_err(map_swap_store_error)?;
        let log = self.feedback_log.entries().await.map_err(map_log_error)?;

        let by_id: HashMap<UserId, &User> = users.iter().map(|user| (*user.id(), user)).collect();

        let stats = PlatformStats {
            total_users: users.len() as u64,
            total_swaps: swaps.len() as u64,
            pending_swaps: swaps
                .iter()
                .filter(|s| s.status() == SwapStatus::Pending)
                .count() as u64,
            accepted_swaps: swaps
                .iter()
                .filter(|s| s.status() == SwapStatus::Accepted)
                .count() as u64,
            rejected_swaps: swaps
                .iter()
                .filter(|s| s.status() == SwapStatus::Rejected)
                .count() as u64,
            banned_users: users.iter().filter(|u| u.is_banned()).count() as u64,
            total_feedback: log.len() as u64,
        };

        let user_rows = users
            .iter()
            .map(|user| ReportUserRow {
                id: *user.id(),
                name: user.name().as_ref().to_owned(),
                email: user.email().as_ref().to_owned(),
                location: user.location().map(str::to_owned),
                is_banned: user.is_banned(),
                is_admin: user.is_admin(),
                created_at: user.created_at(),
            })
            .collect();

        let swap_rows = swaps
            .iter()
            .map(|swap| ReportSwapRow {
                id: *swap.id(),
                from_user: display_name_for(&by_id, swap.from_user()),
                to_user: display_name_for(&by_id, swap.to_user()),
                skill_offered: swap.skill_offered().to_owned(),
                skill_wanted: swap.skill_wanted().to_owned(),
                status: swap.status(),
                created_at: swap.created_at(),
            })
            .collect();

        let feedback_rows = log
            .iter()
            .map(|entry| ReportFeedbackRow {
                swap_id: entry.swap_id,
                author: display_name_for(&by_id, &entry.author),
                rating: entry.rating,
                text: entry.text.clone(),
                recorded_at: entry.recorded_at,
            })
            .collect();

        Ok(PlatformReport {
            stats,
            users: user_rows,
            swaps: swap_rows,
            feedback: feedback_rows,
        })
    }
}

#[async_trait]
impl<U, S, F, M> AdminCommand for AdminService<U, S, F, M>
where
    U: UserRepository,
    S: SwapRepository,
    F: FeedbackLog,
    M: AdminMessageRepository,
{
    async fn broadcast(&self, acting: &UserId, text: &str) -> Result<AdminMessage, Error> {
        self.require_admin(acting).await?;
        let message = AdminMessage::broadcast(text)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        self.messages
            .append(&message)
            .await
            .map_err(map_message_store_error)?;
        tracing::info!(message = %message.id, "broadcast message published");
        Ok(message)
    }

    async fn ban_user(&self, acting: &UserId, target: &UserId) -> Result<(), Error> {
        self.require_admin(acting).await?;
        self.directory.ban_user(target).await
    }

    async fn redact_skill(
        &self,
        acting: &UserId,
        target: &UserId,
        kind: SkillListKind,
        skill: &str,
    ) -> Result<(), Error> {
        self.require_admin(acting).await?;
        self.directory.redact_skill(target, kind, skill).await
    }
}

#[async_trait]
impl<U, S, F, M> AdminQuery for AdminService<U, S, F, M>
where
    U: UserRepository,
    S: SwapRepository,
    F: FeedbackLog,
    M: AdminMessageRepository,
{
    async fn latest_message(&self) -> Result<Option<AdminMessage>, Error> {
        self.messages.latest().await.map_err(map_message_store_error)
    }

    async fn messages(&self) -> Result<Vec<AdminMessage>, Error> {
        self.messages
            .list_newest_first()
            .await
            .map_err(map_message_store_error)
    }

    async fn stats(&self, acting: &UserId) -> Result<PlatformStats, Error> {
        self.require_admin(acting).await?;
        Ok(self.compute_report().await?.stats)
    }

    async fn report(&self, acting: &UserId) -> Result<PlatformReport, Error> {
        self.require_admin(acting).await?;
        self.compute_report().await
    }

    async fn list_users(&self, acting: &UserId) -> Result<Vec<AccountView>, Error> {
        self.require_admin(acting).await?;
        let users = self.users.list_all().await.map_err(map_user_store_error)?;
        Ok(users.iter().map(User::account).collect())
    }
}
