//! Profile API handlers.
//!
//! ```text
//! GET /api/v1/profile
//! POST /api/v1/profile {"age":20,"schoolType":"university","address":"東京都渋谷区"}
//! PATCH /api/v1/profile {"occupation":"student"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::profile::{CITY_MAX, OCCUPATION_MAX, PREFECTURE_MAX, bounded_text};
use crate::domain::{Age, Error, Gender, ProfileDraft, ProfilePatch, SchoolType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ProfileResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile fields accepted on create and update.
///
/// Omitted fields are left unset on create and unchanged on update. When an
/// address is given without a prefecture, the prefecture is derived from it.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[schema(example = 20)]
    pub age: Option<i64>,
    #[schema(example = "female")]
    pub gender: Option<String>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    #[schema(example = "university")]
    pub school_type: Option<String>,
}

impl TryFrom<ProfileRequest> for ProfileDraft {
    type Error = Error;

    fn try_from(value: ProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            age: value.age.map(Age::new).transpose()?,
            gender: value.gender.as_deref().map(str::parse::<Gender>).transpose()?,
            address: value.address,
            prefecture: bounded_text(value.prefecture, "prefecture", PREFECTURE_MAX)?,
            city: bounded_text(value.city, "city", CITY_MAX)?,
            occupation: bounded_text(value.occupation, "occupation", OCCUPATION_MAX)?,
            school_type: value
                .school_type
                .as_deref()
                .map(str::parse::<SchoolType>)
                .transpose()?,
        })
    }
}

impl TryFrom<ProfileRequest> for ProfilePatch {
    type Error = Error;

    fn try_from(value: ProfileRequest) -> Result<Self, Self::Error> {
        let draft = ProfileDraft::try_from(value)?;
        Ok(Self {
            age: draft.age,
            gender: draft.gender,
            address: draft.address,
            prefecture: draft.prefecture,
            city: draft.city,
            occupation: draft.occupation,
            school_type: draft.school_type,
        })
    }
}

/// Profile of the signed-in user, or `null` before one is created.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile or null", body = Option<ProfileResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Profile store unavailable", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<ProfileResponse>>> {
    let user_id = session.require_user_id()?;
    let profile = state.profile.profile(&user_id).await?;
    Ok(web::Json(profile.map(ProfileResponse::from)))
}

/// Create the signed-in user's profile.
#[utoipa::path(
    post,
    path = "/api/v1/profile",
    request_body = ProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Profile already exists", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "createProfile"
)]
#[post("/profile")]
pub async fn create_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = ProfileDraft::try_from(payload.into_inner())?;
    let profile = state.profile_command.create(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(profile)))
}

/// Update fields of the signed-in user's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No profile yet", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[patch("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let patch = ProfilePatch::try_from(payload.into_inner())?;
    let profile = state.profile_command.update(&user_id, patch).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{MockUserProfileCommand, MockUserProfileQuery};
    use crate::domain::{UserId, UserProfile};
    use crate::inbound::http::test_utils::{session_cookie, test_app};

    fn user_id() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id")
    }

    fn stored(draft: ProfileDraft) -> UserProfile {
        let now = Utc
            .with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        draft.into_profile(user_id(), now)
    }

    #[actix_web::test]
    async fn profile_requires_session() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(get_profile)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/profile").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn missing_profile_is_null() {
        let mut query = MockUserProfileQuery::new();
        query.expect_profile().times(1).returning(|_| Ok(None));
        let state = HttpState {
            profile: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(get_profile)),
        )
        .await;
        let cookie = session_cookie(&app, &user_id()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.is_null());
    }

    #[actix_web::test]
    async fn create_returns_created_profile() {
        let mut command = MockUserProfileCommand::new();
        command
            .expect_create()
            .withf(|_, draft| {
                draft.school_type == Some(SchoolType::University)
                    && draft.age.map(Age::get) == Some(20)
            })
            .times(1)
            .returning(|_, draft| Ok(stored(draft)));
        let state = HttpState {
            profile_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(create_profile)),
        )
        .await;
        let cookie = session_cookie(&app, &user_id()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .set_json(json!({
                    "age": 20,
                    "schoolType": "university",
                    "address": "東京都渋谷区神南1-1"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["schoolType"], "university");
        assert_eq!(body["prefecture"], "東京都");
    }

    #[rstest]
    #[case(json!({"age": 151}), "age")]
    #[case(json!({"gender": "robot"}), "gender")]
    #[case(json!({"schoolType": "kindergarten"}), "schoolType")]
    #[case(json!({"city": "x".repeat(101)}), "city")]
    #[actix_web::test]
    async fn invalid_fields_are_rejected(#[case] body: Value, #[case] field: &str) {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(update_profile)),
        )
        .await;
        let cookie = session_cookie(&app, &user_id()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::patch()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: Value = actix_test::read_body_json(response).await;
        assert_eq!(payload["details"]["field"], field);
    }
}
