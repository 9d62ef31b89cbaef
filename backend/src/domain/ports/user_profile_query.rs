//! Driving port for reading profiles.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// The caller's profile, if one was created.
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, Error>;
}

/// Profile query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileQuery;

#[async_trait]
impl UserProfileQuery for FixtureUserProfileQuery {
    async fn profile(&self, _user_id: &UserId) -> Result<Option<UserProfile>, Error> {
        Ok(None)
    }
}
