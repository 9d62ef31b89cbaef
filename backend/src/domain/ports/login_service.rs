//! Driving port for login.
//!
//! Inbound adapters hand over the identity verified by the upstream auth
//! gateway; the service registers or refreshes the account and returns it.

use async_trait::async_trait;

use crate::domain::{Error, ExternalIdentity, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Upsert the account for `identity` and record the sign-in.
    async fn authenticate(&self, identity: &ExternalIdentity) -> Result<User, Error>;
}

/// Login port used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, _identity: &ExternalIdentity) -> Result<User, Error> {
        Err(Error::service_unavailable("account store is not configured"))
    }
}
