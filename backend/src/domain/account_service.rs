//! Account sign-in and lookup.
//!
//! Implements [`LoginService`] and [`UsersQuery`] over a [`UserRepository`].
//! The configured owner account is promoted to admin on every sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::map_user_error;
use crate::domain::ports::{LoginService, UserRepository, UsersQuery};
use crate::domain::{Error, ExternalId, ExternalIdentity, User, UserId, UserRole, UserUpsert};

/// Account service implementing the login and users driving ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    owner_external_id: Option<ExternalId>,
}

impl<U> AccountService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            clock,
            owner_external_id: None,
        }
    }

    /// Promote the account with this external id to admin on sign-in.
    pub fn with_owner(mut self, owner_external_id: Option<ExternalId>) -> Self {
        self.owner_external_id = owner_external_id;
        self
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, identity: &ExternalIdentity) -> Result<User, Error> {
        let is_owner = self.owner_external_id.as_ref() == Some(&identity.external_id);
        let upsert = UserUpsert {
            id: UserId::random(),
            identity: identity.clone(),
            role: is_owner.then_some(UserRole::Admin),
            signed_in_at: self.clock.utc(),
        };
        let user = self.users.upsert(&upsert).await.map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "user signed in");
        Ok(user)
    }
}

#[async_trait]
impl<U> UsersQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use chrono::{DateTime, Utc};
    use mockable::DefaultClock;

    fn identity(external: &str) -> ExternalIdentity {
        ExternalIdentity {
            external_id: ExternalId::new(external).expect("valid external id"),
            name: Some("佐藤 太郎".into()),
            email: Some("taro@example.jp".into()),
            login_method: Some("google".into()),
        }
    }

    fn stored(upsert: &UserUpsert, role: UserRole) -> User {
        User {
            id: upsert.id,
            external_id: upsert.identity.external_id.clone(),
            name: upsert.identity.name.clone(),
            email: upsert.identity.email.clone(),
            login_method: upsert.identity.login_method.clone(),
            role,
            last_signed_in: upsert.signed_in_at,
        }
    }

    fn service(
        repo: MockUserRepository,
        owner: Option<&str>,
    ) -> AccountService<MockUserRepository> {
        AccountService::new(Arc::new(repo), Arc::new(DefaultClock))
            .with_owner(owner.map(|id| ExternalId::new(id).expect("valid owner")))
    }

    #[tokio::test]
    async fn plain_login_leaves_role_unset() {
        let mut repo = MockUserRepository::new();
        repo.expect_upsert()
            .withf(|upsert: &UserUpsert| upsert.role.is_none())
            .times(1)
            .returning(|upsert| Ok(stored(upsert, UserRole::User)));

        let user = service(repo, Some("google|owner"))
            .authenticate(&identity("google|someone"))
            .await
            .expect("login succeeds");
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn owner_login_requests_admin_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_upsert()
            .withf(|upsert: &UserUpsert| upsert.role == Some(UserRole::Admin))
            .times(1)
            .returning(|upsert| Ok(stored(upsert, UserRole::Admin)));

        let user = service(repo, Some("google|owner"))
            .authenticate(&identity("google|owner"))
            .await
            .expect("login succeeds");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn login_records_clock_time() {
        let before: DateTime<Utc> = Utc::now();
        let mut repo = MockUserRepository::new();
        repo.expect_upsert()
            .returning(|upsert| Ok(stored(upsert, UserRole::User)));

        let user = service(repo, None)
            .authenticate(&identity("line|42"))
            .await
            .expect("login succeeds");
        assert!(user.last_signed_in >= before);
    }

    #[tokio::test]
    async fn repository_outage_maps_to_unavailable() {
        let mut repo = MockUserRepository::new();
        repo.expect_upsert()
            .returning(|_| Err(UserPersistenceError::connection("timeout")));

        let err = service(repo, None)
            .authenticate(&identity("line|42"))
            .await
            .expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn current_user_missing_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(repo, None)
            .current_user(&UserId::random())
            .await
            .expect_err("deleted account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
