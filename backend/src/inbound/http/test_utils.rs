//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::gateway::test_support::test_gateway;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn sign_in_as(session: SessionContext, id: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id =
        UserId::new(id.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// App with `state`, test sessions, a gateway keyed with a fixed test secret,
/// and a sign-in shortcut route.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(test_gateway()))
        .wrap(test_session_middleware())
        .route(
            &format!("{SIGN_IN_PATH}/{{id}}"),
            web::post().to(sign_in_as),
        )
}

/// Session cookie for `user_id`, obtained through the sign-in shortcut.
pub async fn session_cookie<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
            .to_request(),
    )
    .await;
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
