//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Accounts are keyed by the upstream identity provider's identifier, so a
//! login upserts on `external_id` and returns the stored row.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserUpsert};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        |message| UserPersistenceError::query(message),
        |message| UserPersistenceError::connection(message),
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(|message| UserPersistenceError::query(message))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn upsert(&self, upsert: &UserUpsert) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from_upsert(upsert);
        let refresh = (
            users::name.eq(excluded(users::name)),
            users::email.eq(excluded(users::email)),
            users::login_method.eq(excluded(users::login_method)),
            users::last_signed_in.eq(excluded(users::last_signed_in)),
            users::updated_at.eq(now),
        );

        let stored: UserRow = if upsert.role.is_some() {
            diesel::insert_into(users::table)
                .values(&row)
                .on_conflict(users::external_id)
                .do_update()
                .set((refresh, users::role.eq(excluded(users::role))))
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
        } else {
            diesel::insert_into(users::table)
                .values(&row)
                .on_conflict(users::external_id)
                .do_update()
                .set(refresh)
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
        }
        .map_err(map_diesel_error)?;

        row_to_user(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }
}
