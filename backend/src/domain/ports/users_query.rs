//! Driving port for reading the signed-in account.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Account behind the session; `unauthorized` if it no longer exists.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}

/// Users query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn current_user(&self, _user_id: &UserId) -> Result<User, Error> {
        Err(Error::unauthorized("login required"))
    }
}
