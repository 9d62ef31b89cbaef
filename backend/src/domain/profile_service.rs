//! Profile creation and partial updates.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    UserProfileCommand, UserProfileQuery, UserProfileRepository, UserProfileRepositoryError,
};
use crate::domain::{Error, ProfileDraft, ProfilePatch, UserId, UserProfile};

/// Profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct ProfileService<P> {
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> ProfileService<P> {
    pub fn new(profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }
}

pub(crate) fn map_profile_error(error: UserProfileRepositoryError) -> Error {
    match error {
        UserProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        UserProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
        UserProfileRepositoryError::AlreadyExists => Error::conflict("profile already exists")
            .with_details(json!({ "code": "profile_exists" })),
        UserProfileRepositoryError::NotFound => Error::not_found("profile not found"),
    }
}

#[async_trait]
impl<P> UserProfileQuery for ProfileService<P>
where
    P: UserProfileRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, Error> {
        self.profiles.find(user_id).await.map_err(map_profile_error)
    }
}

#[async_trait]
impl<P> UserProfileCommand for ProfileService<P>
where
    P: UserProfileRepository,
{
    async fn create(&self, user_id: &UserId, draft: ProfileDraft) -> Result<UserProfile, Error> {
        let profile = draft.into_profile(*user_id, self.clock.utc());
        self.profiles
            .insert(&profile)
            .await
            .map_err(map_profile_error)?;
        info!(%user_id, prefecture = ?profile.prefecture, "profile created");
        Ok(profile)
    }

    async fn update(&self, user_id: &UserId, patch: ProfilePatch) -> Result<UserProfile, Error> {
        let current = self
            .profiles
            .find(user_id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        let updated = patch.apply(current, self.clock.utc());
        self.profiles
            .update(&updated)
            .await
            .map_err(map_profile_error)?;
        Ok(updated)
    }
}
