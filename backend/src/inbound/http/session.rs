//! Cookie session access for handlers.
//!
//! The private session cookie holds only the account id. Roles are looked up
//! on every request, so a promotion or demotion applies immediately.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Extractor wrapping the Actix session with account-level operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `user_id`.
    ///
    /// The session is renewed first so a cookie planted before login cannot
    /// be reused afterwards.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Expire the cookie.
    pub fn forget(&self) {
        self.0.purge();
    }

    /// Signed-in account, if any. A cookie holding something other than a
    /// user id is purged and treated as signed out.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
        else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "discarding session with malformed user id");
                self.forget();
                Ok(None)
            }
        }
    }

    /// Signed-in account or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::test_utils::test_session_middleware;

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    async fn plant(session: Session, path: web::Path<String>) -> HttpResponse {
        match session.insert(USER_ID_KEY, path.into_inner()) {
            Ok(()) => HttpResponse::Ok().finish(),
            Err(_) => HttpResponse::InternalServerError().finish(),
        }
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::OK)]
    #[case("not-a-uuid", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn only_well_formed_ids_authenticate(#[case] stored: &str, #[case] expected: StatusCode) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/plant/{id}", web::get().to(plant))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let planted = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/plant/{stored}"))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&planted).expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::OK {
            assert_eq!(test::read_body(res).await, stored);
        }
    }

    #[actix_web::test]
    async fn persisting_a_user_replaces_the_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/plant/{id}", web::get().to(plant))
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&UserId::random())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let planted = test::call_service(
            &app,
            test::TestRequest::get().uri("/plant/x").to_request(),
        )
        .await;
        let before = session_cookie(&planted).expect("planted cookie");
        let login = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/login")
                .cookie(before.clone())
                .to_request(),
        )
        .await;
        let after = session_cookie(&login).expect("fresh cookie");
        assert_ne!(before.value(), after.value());
    }

    #[actix_web::test]
    async fn forgetting_expires_the_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/plant/{id}", web::get().to(plant))
                .route(
                    "/logout",
                    web::get().to(|session: SessionContext| async move {
                        session.forget();
                        HttpResponse::Ok()
                    }),
                ),
        )
        .await;

        let planted = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/plant/{}", UserId::random()))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&planted).expect("session cookie set");
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = session_cookie(&res).expect("removal cookie set");
        assert_eq!(removal.value(), "");
    }
}
