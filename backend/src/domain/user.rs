//! User directory data model.
//!
//! Users advertise the skills they offer and the skills they want. The
//! directory only ever exposes display-safe projections ([`UserProfile`],
//! [`ParticipantSummary`], [`AccountView`]); the opaque credential never
//! leaves the domain.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Sentinel written over a skill entry redacted by a moderator. The list
/// keeps its length so positional references stay valid.
pub const REDACTED_SKILL: &str = "[removed]";

/// Validation errors raised by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("display name contains unsupported characters")]
    DisplayNameInvalidCharacters,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("credential must not be empty")]
    EmptyCredential,
    #[error("skill list kind must be \"offered\" or \"wanted\"")]
    UnknownSkillListKind,
}

/// Stable user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this constrains allowed characters.
        let pattern = r"^[\p{L}\p{N} _.,'-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("display name regex failed to compile: {error}"))
    })
}

/// Human readable display name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if !display_name_regex().is_match(&name) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Login identifier, normalised to lowercase.
///
/// The check here is intentionally shallow: deliverability is an identity
/// provider concern, the directory only needs a stable unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(raw.into())
    }

    fn from_owned(raw: String) -> Result<Self, UserValidationError> {
        let raw = raw.trim().to_lowercase();
        let Some((local, host)) = raw.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || host.is_empty() || host.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Opaque credential attached to a user record.
///
/// The hashing scheme (if any) belongs to the identity provider; the domain
/// only performs an equality check and never serialises the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Construct a credential from an opaque non-empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyCredential);
        }
        Ok(Self(raw))
    }

    /// Compare a presented secret against the stored credential.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Which of a user's two skill lists a moderation action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillListKind {
    Offered,
    Wanted,
}

impl FromStr for SkillListKind {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offered" => Ok(Self::Offered),
            "wanted" => Ok(Self::Wanted),
            _ => Err(UserValidationError::UnknownSkillListKind),
        }
    }
}

/// A user record held by the directory.
///
/// ## Invariants
/// - A banned user is never public (`ban` clears `is_public`).
/// - Skill lists keep insertion order; duplicates are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    credential: Credential,
    location: Option<String>,
    photo: Option<String>,
    availability: Option<String>,
    skills_offered: Vec<String>,
    skills_wanted: Vec<String>,
    is_public: bool,
    is_banned: bool,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh public, unbanned, non-admin user.
    pub fn new(name: DisplayName, email: EmailAddress, credential: Credential) -> Self {
        Self {
            id: UserId::random(),
            name,
            email,
            credential,
            location: None,
            photo: None,
            availability: None,
            skills_offered: Vec::new(),
            skills_wanted: Vec::new(),
            is_public: true,
            is_banned: false,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_photo(mut self, photo: Option<String>) -> Self {
        self.photo = photo;
        self
    }

    #[must_use]
    pub fn with_availability(mut self, availability: Option<String>) -> Self {
        self.availability = availability;
        self
    }

    #[must_use]
    pub fn with_skills_offered(mut self, skills: Vec<String>) -> Self {
        self.skills_offered = skills;
        self
    }

    #[must_use]
    pub fn with_skills_wanted(mut self, skills: Vec<String>) -> Self {
        self.skills_wanted = skills;
        self
    }

    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    #[must_use]
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn availability(&self) -> Option<&str> {
        self.availability.as_deref()
    }

    pub fn skills_offered(&self) -> &[String] {
        &self.skills_offered
    }

    pub fn skills_wanted(&self) -> &[String] {
        &self.skills_wanted
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_banned(&self) -> bool {
        self.is_banned
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when the user offers the named skill (case-sensitive).
    pub fn offers_skill(&self, skill: &str) -> bool {
        self.skills_offered.iter().any(|s| s == skill)
    }

    /// Case-insensitive substring match over name, location, and both skill
    /// lists. Used by the public directory search.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let haystacks = [Some(self.name.as_ref()), self.location.as_deref()];
        haystacks
            .into_iter()
            .flatten()
            .chain(self.skills_offered.iter().map(String::as_str))
            .chain(self.skills_wanted.iter().map(String::as_str))
            .any(|text| text.to_lowercase().contains(&needle))
    }

    /// Ban the user. Idempotent; a banned user is always private.
    pub fn ban(&mut self) {
        self.is_banned = true;
        self.is_public = false;
    }

    /// Replace the first exact match of `skill` in the named list with the
    /// [`REDACTED_SKILL`] sentinel. Returns whether anything changed.
    pub fn redact_skill(&mut self, kind: SkillListKind, skill: &str) -> bool {
        let list = match kind {
            SkillListKind::Offered => &mut self.skills_offered,
            SkillListKind::Wanted => &mut self.skills_wanted,
        };
        match list.iter().position(|entry| entry == skill) {
            Some(index) => {
                list[index] = REDACTED_SKILL.to_owned();
                true
            }
            None => false,
        }
    }

    /// Apply a partial profile update. `None` fields keep their current
    /// value; optional text fields are cleared by an empty string.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(location) = update.location {
            self.location = non_empty(location);
        }
        if let Some(photo) = update.photo {
            self.photo = non_empty(photo);
        }
        if let Some(availability) = update.availability {
            self.availability = non_empty(availability);
        }
        if let Some(skills) = update.skills_offered {
            self.skills_offered = skills;
        }
        if let Some(skills) = update.skills_wanted {
            self.skills_wanted = skills;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
    }

    /// Public directory projection. No email, no credential.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.to_string(),
            location: self.location.clone(),
            photo: self.photo.clone(),
            availability: self.availability.clone(),
            skills_offered: self.skills_offered.clone(),
            skills_wanted: self.skills_wanted.clone(),
        }
    }

    /// Short projection used when resolving swap participants.
    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id,
            name: self.name.to_string(),
            location: self.location.clone(),
            photo: self.photo.clone(),
        }
    }

    /// Self-view projection returned to the account owner and admins.
    pub fn account(&self) -> AccountView {
        AccountView {
            id: self.id,
            name: self.name.to_string(),
            email: self.email.to_string(),
            location: self.location.clone(),
            photo: self.photo.clone(),
            availability: self.availability.clone(),
            skills_offered: self.skills_offered.clone(),
            skills_wanted: self.skills_wanted.clone(),
            is_public: self.is_public,
            is_banned: self.is_banned,
            is_admin: self.is_admin,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Validated partial update applied by [`User::apply_profile_update`].
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<DisplayName>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub availability: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Display-safe projection of a user for public browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
}

/// Minimal projection of a swap participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Projection of a user's own account, including private flags but never
/// the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub is_public: bool,
    pub is_banned: bool,
    pub is_admin: bool,
}
