//! User accounts and identifiers.
//!
//! Accounts are keyed internally by [`UserId`] and externally by the
//! identifier issued by the upstream auth provider ([`ExternalId`]).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of an external login identifier.
pub const EXTERNAL_ID_MAX: usize = 64;

/// Validation errors raised while constructing user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("external id must not be empty")]
    EmptyExternalId,
    #[error("external id must be at most {max} characters")]
    ExternalIdTooLong { max: usize },
    #[error("unknown role: {value}")]
    UnknownRole { value: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier issued by the upstream identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Validate and construct an [`ExternalId`].
    ///
    /// # Examples
    /// ```
    /// use localconnect::domain::ExternalId;
    ///
    /// let id = ExternalId::new(" google|123 ").expect("valid id");
    /// assert_eq!(id.as_ref(), "google|123");
    /// assert!(ExternalId::new("   ").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyExternalId);
        }
        if trimmed.chars().count() > EXTERNAL_ID_MAX {
            return Err(UserValidationError::ExternalIdTooLong {
                max: EXTERNAL_ID_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account role driving the permission table in [`crate::domain::rbac`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Planner,
    Admin,
}

impl UserRole {
    /// Stable string form used in storage and payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Planner => "planner",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "planner" => Ok(Self::Planner),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub external_id: ExternalId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: UserRole,
    pub last_signed_in: DateTime<Utc>,
}

/// Verified identity presented by the upstream auth gateway on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub external_id: ExternalId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
}

/// Upsert payload for the user repository.
///
/// New accounts take `role` or fall back to [`UserRole::User`]; existing
/// accounts keep their role unless `role` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpsert {
    pub id: UserId,
    pub identity: ExternalIdentity,
    pub role: Option<UserRole>,
    pub signed_in_at: DateTime<Utc>,
}
