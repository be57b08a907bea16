//! Driving port for session login.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::AccountView;

/// Use-case port for authenticating a user against the directory.
///
/// Credential verification is an opaque equality check; hashing and token
/// issuance belong to the identity provider, not the core.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve an email/credential pair to an account, or fail with
    /// `Unauthorized`.
    async fn login(&self, email: &str, credential: &str) -> Result<AccountView, Error>;
}
