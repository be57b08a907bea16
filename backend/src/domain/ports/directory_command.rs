//! Driving port for user directory mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{AccountView, UserId};

/// Validated-at-the-edge registration input. String fields are parsed into
/// domain newtypes by the service before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub credential: String,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub availability: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
}

/// Partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub availability: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Use-case port for account self-service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryCommand: Send + Sync {
    /// Create a new account. Duplicate email fails with `Conflict`.
    async fn register(&self, request: RegisterUserRequest) -> Result<AccountView, Error>;

    /// Apply a partial profile update to the acting user's own record.
    async fn update_profile(
        &self,
        user: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<AccountView, Error>;
}
