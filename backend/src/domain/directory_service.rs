//! User directory service.
//!
//! Implements the directory driving ports on top of a [`UserRepository`].
//! Moderation actions (ban, redact) live here too so the admin overlay can
//! delegate to one place.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::error::Error;
use crate::domain::ports::{
    DirectoryCommand, DirectoryQuery, LoginService, RegisterUserRequest, UpdateProfileRequest,
    UserPersistenceError, UserRepository,
};
use crate::domain::user::{
    AccountView, Credential, DisplayName, EmailAddress, ProfileUpdate, SkillListKind, User,
    UserId, UserProfile, UserValidationError,
};

/// Directory service implementing registration, login, browsing, profile
/// updates, and the moderation primitives.
#[derive(Clone)]
pub struct DirectoryService<U> {
    users: Arc<U>,
}

impl<U> DirectoryService<U> {
    /// Create a new service backed by the given repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn map_store_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("a user with email {email} already exists"))
        }
        UserPersistenceError::Missing { id } => Error::not_found(format!("user {id} not found")),
    }
}

fn map_validation_error(field: &'static str, error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

impl<U> DirectoryService<U>
where
    U: UserRepository,
{
    async fn fetch_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Set the banned flag and hide the user from the public directory.
    /// Idempotent; fails with `NotFound` for an unknown id.
    pub async fn ban_user(&self, target: &UserId) -> Result<(), Error> {
        let mut user = self.fetch_user(target).await?;
        if user.is_banned() {
            return Ok(());
        }
        user.ban();
        self.users.update(&user).await.map_err(map_store_error)?;
        tracing::info!(user = %target, "user banned");
        Ok(())
    }

    /// Replace the first exact match of `skill` in the named list with the
    /// redaction sentinel. Absent skills are a no-op, not an error.
    pub async fn redact_skill(
        &self,
        target: &UserId,
        kind: SkillListKind,
        skill: &str,
    ) -> Result<(), Error> {
        let mut user = self.fetch_user(target).await?;
        if user.redact_skill(kind, skill) {
            self.users.update(&user).await.map_err(map_store_error)?;
            tracing::info!(user = %target, ?kind, "skill redacted");
        }
        Ok(())
    }
}

#[async_trait]
impl<U> DirectoryQuery for DirectoryService<U>
where
    U: UserRepository,
{
    async fn find_public_users<'a>(
        &self,
        search: Option<&'a str>,
    ) -> Result<Vec<UserProfile>, Error> {
        let users = self.users.list_all().await.map_err(map_store_error)?;
        let profiles = users
            .iter()
            .filter(|user| user.is_public() && !user.is_banned())
            .filter(|user| match search {
                Some(needle) => user.matches_search(needle),
                None => true,
            })
            .map(User::profile)
            .collect();
        Ok(profiles)
    }

    async fn fetch_account(&self, id: &UserId) -> Result<AccountView, Error> {
        Ok(self.fetch_user(id).await?.account())
    }
}

#[async_trait]
impl<U> DirectoryCommand for DirectoryService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<AccountView, Error> {
        let name = DisplayName::new(request.name)
            .map_err(|error| map_validation_error("name", error))?;
        let email = EmailAddress::new(request.email)
            .map_err(|error| map_validation_error("email", error))?;
        let credential = Credential::new(request.credential)
            .map_err(|error| map_validation_error("password", error))?;

        let user = User::new(name, email, credential)
            .with_location(request.location)
            .with_photo(request.photo)
            .with_availability(request.availability)
            .with_skills_offered(request.skills_offered)
            .with_skills_wanted(request.skills_wanted);

        self.users.insert(&user).await.map_err(map_store_error)?;
        tracing::info!(user = %user.id(), "user registered");
        Ok(user.account())
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<AccountView, Error> {
        let mut user = self.fetch_user(user_id).await?;

        let name = match request.name {
            Some(raw) => {
                Some(DisplayName::new(raw).map_err(|error| map_validation_error("name", error))?)
            }
            None => None,
        };
        user.apply_profile_update(ProfileUpdate {
            name,
            location: request.location,
            photo: request.photo,
            availability: request.availability,
            skills_offered: request.skills_offered,
            skills_wanted: request.skills_wanted,
            is_public: request.is_public,
        });

        self.users.update(&user).await.map_err(map_store_error)?;
        Ok(user.account())
    }
}

#[async_trait]
impl<U> LoginService for DirectoryService<U>
where
    U: UserRepository,
{
    async fn login(&self, email: &str, credential: &str) -> Result<AccountView, Error> {
        let email = EmailAddress::new(email)
            .map_err(|_| Error::unauthorized("invalid credentials"))?;
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        if !user.credential().matches(credential) {
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(user.account())
    }
}
