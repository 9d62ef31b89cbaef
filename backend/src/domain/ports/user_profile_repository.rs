//! Driven port for profile persistence.
use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// A profile already exists for the user.
        AlreadyExists => "profile already exists",
        /// No profile exists for the user.
        NotFound => "profile not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn find(&self, user_id: &UserId)
    -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Insert a new profile; fails with `AlreadyExists` on a second insert.
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError>;

    /// Overwrite an existing profile; fails with `NotFound` when absent.
    async fn update(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError>;
}
