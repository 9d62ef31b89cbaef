//! Driving port for creating and editing profiles.

use async_trait::async_trait;

use crate::domain::{Error, ProfileDraft, ProfilePatch, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Create the caller's profile; `conflict` if one exists.
    async fn create(&self, user_id: &UserId, draft: ProfileDraft) -> Result<UserProfile, Error>;

    /// Apply a partial update; `not_found` if no profile exists.
    async fn update(&self, user_id: &UserId, patch: ProfilePatch) -> Result<UserProfile, Error>;
}

/// Profile command used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileCommand;

#[async_trait]
impl UserProfileCommand for FixtureUserProfileCommand {
    async fn create(&self, _user_id: &UserId, _draft: ProfileDraft) -> Result<UserProfile, Error> {
        Err(Error::service_unavailable("profile store is not configured"))
    }

    async fn update(&self, _user_id: &UserId, _patch: ProfilePatch) -> Result<UserProfile, Error> {
        Err(Error::service_unavailable("profile store is not configured"))
    }
}
