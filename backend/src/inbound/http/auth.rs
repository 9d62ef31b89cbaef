//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"externalId":"google|123","issuedAt":"2026-04-01T09:00:00Z"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/me
//! ```
//!
//! The upstream auth gateway verifies the identity and signs the login body
//! (see [`crate::inbound::http::gateway`]); these handlers check that proof,
//! register the account and bind it to the session cookie.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::{Error, ErrorCode, ExternalId, ExternalIdentity, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::gateway::{GATEWAY_SIGNATURE_HEADER, GatewayVerifier};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub external_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    /// When the gateway issued this assertion.
    pub issued_at: DateTime<Utc>,
}

impl TryFrom<LoginRequest> for ExternalIdentity {
    type Error = UserValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            external_id: ExternalId::new(&value.external_id)?,
            name: value.name,
            email: value.email,
            login_method: value.login_method,
        })
    }
}

fn map_identity_error(err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::ExternalIdTooLong { .. } => "too_long",
        _ => "missing_field",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "externalId", "code": code }))
}

/// Register or refresh the account and establish a session.
///
/// The body must carry a valid gateway signature; anything else is `401`
/// before the body is even parsed.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    params(
        ("x-gateway-signature" = String, Header,
            description = "Hex HMAC-SHA256 of the raw body under the gateway secret")
    ),
    responses(
        (status = 200, description = "Signed in", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No valid gateway proof", body = ErrorSchema),
        (status = 503, description = "Account store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    gateway: web::Data<GatewayVerifier>,
    session: SessionContext,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<UserResponse>> {
    let signature = request
        .headers()
        .get(GATEWAY_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(err) = gateway.verify(&body, signature) {
        warn!(reason = ?err.details(), "login without a valid gateway proof");
        return Err(err);
    }

    let payload: LoginRequest = serde_json::from_slice(&body)
        .map_err(|err| Error::invalid_request(format!("invalid login body: {err}")))?;
    gateway.check_freshness(payload.issued_at)?;
    let identity = ExternalIdentity::try_from(payload).map_err(map_identity_error)?;
    let user = state.login.authenticate(&identity).await?;
    session.persist_user(&user.id)?;
    info!(user_id = %user.id, role = %user.role, "user signed in");
    Ok(web::Json(UserResponse::from(user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}

/// The signed-in account, or `null` for anonymous callers.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user or null", body = Option<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security([])
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<UserResponse>>> {
    let Some(user_id) = session.user_id()? else {
        return Ok(web::Json(None));
    };
    match state.users.current_user(&user_id).await {
        Ok(user) => Ok(web::Json(Some(UserResponse::from(user)))),
        // A session pointing at a deleted account reads as signed out.
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            session.forget();
            Ok(web::Json(None))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::{MockLoginService, MockUsersQuery};
    use crate::domain::{User, UserId, UserRole};
    use crate::inbound::http::gateway::test_support::{gateway_now, test_gateway};
    use crate::inbound::http::test_utils::{session_cookie, test_app, test_session_middleware};

    fn planner() -> User {
        User {
            id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id"),
            external_id: ExternalId::new("google|123").expect("valid external id"),
            name: Some("Aiko".to_owned()),
            email: None,
            login_method: Some("google".to_owned()),
            role: UserRole::Planner,
            last_signed_in: Utc
                .with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn login_request(external_id: &str) -> LoginRequest {
        LoginRequest {
            external_id: external_id.to_owned(),
            name: Some("Aiko".to_owned()),
            email: None,
            login_method: Some("google".to_owned()),
            issued_at: gateway_now(),
        }
    }

    /// Login request as the gateway forwards it, signed with the test secret.
    fn signed_login(request: &LoginRequest) -> actix_test::TestRequest {
        let body = serde_json::to_vec(request).expect("serialisable request");
        let signature = test_gateway().sign(&body);
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("content-type", "application/json"))
            .insert_header((GATEWAY_SIGNATURE_HEADER, signature))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn login_sets_cookie_and_returns_user() {
        let mut accounts = MockLoginService::new();
        accounts
            .expect_authenticate()
            .withf(|identity| identity.external_id.as_ref() == "google|123")
            .times(1)
            .returning(|_| Ok(planner()));
        let state = HttpState {
            login: Arc::new(accounts),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(login)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            signed_login(&login_request(" google|123 ")).to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.response().cookies().any(|c| c.name() == "session"));
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["role"], "planner");
        assert_eq!(body["loginMethod"], "google");
        assert!(body["permissions"].is_array());
    }

    #[rstest]
    #[case("   ".to_owned(), "missing_field")]
    #[case("x".repeat(65), "too_long")]
    #[actix_web::test]
    async fn login_rejects_bad_external_id(#[case] external_id: String, #[case] code: &str) {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(login)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            signed_login(&login_request(&external_id)).to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "externalId");
        assert_eq!(body["details"]["code"], code);
    }

    fn never_authenticates() -> HttpState {
        let mut accounts = MockLoginService::new();
        accounts.expect_authenticate().never();
        HttpState {
            login: Arc::new(accounts),
            ..HttpState::fixtures()
        }
    }

    #[rstest]
    #[case::no_signature(None, "missing_signature")]
    #[case::forged_signature(Some("00".repeat(32)), "bad_signature")]
    #[actix_web::test]
    async fn unproven_owner_claim_is_unauthorised(
        #[case] signature: Option<String>,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(
            test_app(never_authenticates()).service(web::scope("/api/v1").service(login)),
        )
        .await;
        let mut request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "externalId": "google|owner", "issuedAt": gateway_now() }));
        if let Some(signature) = signature {
            request = request.insert_header((GATEWAY_SIGNATURE_HEADER, signature));
        }

        let response = actix_test::call_service(&app, request.to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!response.response().cookies().any(|c| c.name() == "session"));
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn replayed_assertion_is_unauthorised() {
        let app = actix_test::init_service(
            test_app(never_authenticates()).service(web::scope("/api/v1").service(login)),
        )
        .await;
        let stale = LoginRequest {
            issued_at: gateway_now() - chrono::Duration::hours(1),
            ..login_request("google|123")
        };

        let response = actix_test::call_service(&app, signed_login(&stale).to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "stale_assertion");
    }

    #[actix_web::test]
    async fn login_is_refused_when_no_gateway_secret_is_configured() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(never_authenticates()))
                .app_data(web::Data::new(GatewayVerifier::disabled()))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let response =
            actix_test::call_service(&app, signed_login(&login_request("google|123")).to_request())
                .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "login_disabled");
    }

    #[actix_web::test]
    async fn me_is_null_without_session() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(me)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.is_null());
    }

    #[actix_web::test]
    async fn me_returns_session_user() {
        let user = planner();
        let mut users = MockUsersQuery::new();
        users
            .expect_current_user()
            .times(1)
            .returning(|_| Ok(planner()));
        let state = HttpState {
            users: Arc::new(users),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(me)),
        )
        .await;
        let cookie = session_cookie(&app, &user.id).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["id"], user.id.to_string());
        assert_eq!(body["roleDisplayName"], "イベントプランナー");
    }

    #[actix_web::test]
    async fn logout_expires_cookie() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(logout)),
        )
        .await;
        let cookie = session_cookie(&app, &planner().id).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let removal = response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("removal cookie");
        assert_eq!(removal.value(), "");
    }
}
