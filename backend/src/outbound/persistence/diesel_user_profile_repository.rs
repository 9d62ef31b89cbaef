//! PostgreSQL-backed `UserProfileRepository` implementation.
//!
//! Inserts rely on the primary key to reject a second profile for the same
//! user; updates overwrite the whole row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{UserId, UserProfile};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{UserProfileRecord, UserProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_profiles;

/// Diesel-backed implementation of the `UserProfileRepository` port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserProfileRepositoryError {
    map_basic_pool_error(error, |message| {
        UserProfileRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> UserProfileRepositoryError {
    if is_unique_violation(&error) {
        return UserProfileRepositoryError::already_exists();
    }
    map_basic_diesel_error(
        error,
        |message| UserProfileRepositoryError::query(message),
        |message| UserProfileRepositoryError::connection(message),
    )
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        user_profiles::table
            .filter(user_profiles::user_id.eq(user_id.as_uuid()))
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(|row| {
                UserProfile::try_from(row)
                    .map_err(|message| UserProfileRepositoryError::query(message))
            })
            .transpose()
    }

    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(user_profiles::table)
            .values(UserProfileRecord::from(profile))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(user_profiles::table)
            .filter(user_profiles::user_id.eq(profile.user_id.as_uuid()))
            .set(UserProfileRecord::from(profile))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserProfileRepositoryError::not_found());
        }
        Ok(())
    }
}
