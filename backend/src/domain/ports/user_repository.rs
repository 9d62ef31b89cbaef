//! Driven port for account persistence.
use async_trait::async_trait;

use crate::domain::{User, UserId, UserUpsert};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account keyed by external id, or refresh the existing one.
    ///
    /// Existing accounts keep their id and role unless `upsert.role` is set.
    async fn upsert(&self, upsert: &UserUpsert) -> Result<User, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
