//! Region lookup handlers.
//!
//! ```text
//! GET /api/v1/regions/prefectures
//! GET /api/v1/regions/prefecture?address=東京都渋谷区神南1-1
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{PREFECTURES, extract_prefecture_from_address};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::PrefectureResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Query parameters for `GET /api/v1/regions/prefecture`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AddressQuery {
    /// Free-form Japanese address.
    pub address: Option<String>,
}

/// All 47 prefectures in JIS order.
#[utoipa::path(
    get,
    path = "/api/v1/regions/prefectures",
    responses((status = 200, description = "Prefectures", body = [PrefectureResponse])),
    tags = ["regions"],
    operation_id = "listPrefectures",
    security([])
)]
#[get("/regions/prefectures")]
pub async fn list_prefectures() -> web::Json<Vec<PrefectureResponse>> {
    web::Json(PREFECTURES.iter().map(PrefectureResponse::from).collect())
}

/// Prefecture an address starts with, or `null`.
#[utoipa::path(
    get,
    path = "/api/v1/regions/prefecture",
    params(AddressQuery),
    responses(
        (status = 200, description = "Matching prefecture or null", body = Option<PrefectureResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["regions"],
    operation_id = "prefectureFromAddress",
    security([])
)]
#[get("/regions/prefecture")]
pub async fn prefecture_from_address(
    query: web::Query<AddressQuery>,
) -> ApiResult<web::Json<Option<PrefectureResponse>>> {
    let address = query
        .address
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("address")))?;
    Ok(web::Json(
        extract_prefecture_from_address(address).map(PrefectureResponse::from),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    fn app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().service(
            web::scope("/api/v1")
                .service(list_prefectures)
                .service(prefecture_from_address),
        )
    }

    #[actix_web::test]
    async fn lists_every_prefecture_in_code_order() {
        let app = actix_test::init_service(app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/regions/prefectures")
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(response).await;
        let items = body.as_array().expect("array");
        assert_eq!(items.len(), 47);
        assert_eq!(items.first().map(|p| &p["name"]), Some(&Value::from("北海道")));
        assert_eq!(items.last().map(|p| &p["code"]), Some(&Value::from("47")));
    }

    #[rstest]
    #[case("%E4%BA%AC%E9%83%BD%E5%BA%9C%E4%BA%AC%E9%83%BD%E5%B8%82", Some("京都府"))]
    #[case("Springfield", None)]
    #[actix_web::test]
    async fn resolves_address(#[case] encoded: &str, #[case] expected: Option<&str>) {
        let app = actix_test::init_service(app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/regions/prefecture?address={encoded}"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["name"].as_str(), expected);
    }

    #[actix_web::test]
    async fn address_is_required() {
        let app = actix_test::init_service(app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/regions/prefecture")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
