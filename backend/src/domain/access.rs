//! Permission checks for services acting on behalf of a signed-in user.

use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Error, Permission, User, UserId, require_permission};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Load `actor` and require that their role grants `permission`.
pub(crate) async fn authorize<U>(
    users: &U,
    actor: &UserId,
    permission: Permission,
) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    let user = users
        .find_by_id(actor)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    if let Err(err) = require_permission(Some(user.role), permission) {
        debug!(user_id = %actor, %permission, role = %user.role, "permission denied");
        return Err(err);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, ExternalId, UserRole};
    use chrono::Utc;

    fn user_with_role(id: UserId, role: UserRole) -> User {
        User {
            id,
            external_id: ExternalId::new(format!("test|{id}")).expect("valid external id"),
            name: Some("山田 花子".into()),
            email: None,
            login_method: None,
            role,
            last_signed_in: Utc::now(),
        }
    }

    #[tokio::test]
    async fn admin_may_create_articles() {
        let id = UserId::random();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user_with_role(id, UserRole::Admin))));

        let user = authorize(&repo, &id, Permission::CreateArticles)
            .await
            .expect("admin authorised");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn plain_user_is_forbidden() {
        let id = UserId::random();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(user_with_role(id, UserRole::User))));

        let err = authorize(&repo, &id, Permission::CreateEvents)
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn missing_account_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = authorize(&repo, &UserId::random(), Permission::CreateGifts)
            .await
            .expect_err("unknown account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn connection_failure_is_unavailable() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(UserPersistenceError::connection("refused")));

        let err = authorize(&repo, &UserId::random(), Permission::CreateGifts)
            .await
            .expect_err("pool down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
