//! Gift API handlers.
//!
//! ```text
//! GET /api/v1/gifts?prefecture=東京都
//! GET /api/v1/gifts/nearby?latitude=35.68&longitude=139.76&limit=10
//! GET /api/v1/gifts/{id}
//! POST /api/v1/gifts {"storeName":"Cafe Mori","giftTitle":"Free coffee",...}
//! GET /api/v1/gifts/{id}/usage
//! POST /api/v1/gifts/{id}/use
//! POST /api/v1/gifts/verify {"qrCode":"GIFT-3-..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, GiftDraft, GiftId, NEARBY_DEFAULT_LIMIT};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    GiftResponse, GiftUsageResponse, GiftUsageSummaryResponse, GiftUsageWithGiftResponse,
    NearbyGiftResponse, PageResponse, RedemptionCodeRequest, RegionPageQuery,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tickets::scanned_code;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_optional_rfc3339_timestamp, parse_page, parse_point,
};

/// Query parameters for `GET /api/v1/gifts/nearby`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    #[param(example = 35.6812)]
    pub latitude: Option<f64>,
    #[param(example = 139.7671)]
    pub longitude: Option<f64>,
    /// Maximum results, 1 to 100; defaults to 20.
    pub limit: Option<u32>,
}

/// Request body for `POST /api/v1/gifts`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftRequest {
    pub store_name: Option<String>,
    pub gift_title: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = "2026-12-31T23:59:59+09:00")]
    pub expiry_date: Option<String>,
    /// Redemptions allowed per user; defaults to 1.
    pub usage_limit: Option<i64>,
    pub age_restriction: Option<i64>,
    /// One of `none`, `high_school`, `university`, `working`.
    pub school_type_restriction: Option<String>,
}

impl TryFrom<CreateGiftRequest> for GiftDraft {
    type Error = Error;

    fn try_from(value: CreateGiftRequest) -> Result<Self, Self::Error> {
        fn required<T>(field: Option<T>, name: &'static str) -> Result<T, Error> {
            field.ok_or_else(|| missing_field_error(FieldName::new(name)))
        }

        Ok(Self {
            store_name: required(value.store_name, "storeName")?,
            gift_title: required(value.gift_title, "giftTitle")?,
            description: required(value.description, "description")?,
            latitude: required(value.latitude, "latitude")?,
            longitude: required(value.longitude, "longitude")?,
            address: value.address,
            prefecture: value.prefecture,
            city: value.city,
            image_url: value.image_url,
            expiry_date: parse_optional_rfc3339_timestamp(
                value.expiry_date,
                FieldName::new("expiryDate"),
            )?,
            usage_limit: value.usage_limit,
            age_restriction: value.age_restriction,
            school_type_restriction: value.school_type_restriction,
        })
    }
}

/// List active gifts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/gifts",
    params(RegionPageQuery),
    responses(
        (status = 200, description = "Gifts", body = PageResponse<GiftResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "listGifts",
    security([])
)]
#[get("/gifts")]
pub async fn list_gifts(
    state: web::Data<HttpState>,
    query: web::Query<RegionPageQuery>,
) -> ApiResult<web::Json<PageResponse<GiftResponse>>> {
    let page = parse_page(query.limit, query.offset)?;
    let gifts = state.gifts.list(query.region(), page).await?;
    Ok(web::Json(PageResponse::from_page(gifts)))
}

/// Active gifts nearest to a point, closest first.
#[utoipa::path(
    get,
    path = "/api/v1/gifts/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Gifts with distance", body = [NearbyGiftResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "nearbyGifts",
    security([])
)]
#[get("/gifts/nearby")]
pub async fn nearby_gifts(
    state: web::Data<HttpState>,
    query: web::Query<NearbyQuery>,
) -> ApiResult<web::Json<Vec<NearbyGiftResponse>>> {
    let latitude = query
        .latitude
        .ok_or_else(|| missing_field_error(FieldName::new("latitude")))?;
    let longitude = query
        .longitude
        .ok_or_else(|| missing_field_error(FieldName::new("longitude")))?;
    let origin = parse_point(latitude, longitude)?;
    let limit = query
        .limit
        .map_or(NEARBY_DEFAULT_LIMIT, |limit| limit as usize);
    let ranked = state.gifts.nearby(origin, limit).await?;
    Ok(web::Json(
        ranked.into_iter().map(NearbyGiftResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/gifts/{id}",
    params(("id" = i64, Path, description = "Gift id")),
    responses(
        (status = 200, description = "Gift", body = GiftResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "getGift",
    security([])
)]
#[get("/gifts/{id}")]
pub async fn get_gift(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<GiftResponse>> {
    let gift = state.gifts.get(GiftId::new(path.into_inner())).await?;
    Ok(web::Json(GiftResponse::from(gift)))
}

/// Create a gift. Requires the `create_gifts` permission.
///
/// The prefecture is derived from the address when not given.
#[utoipa::path(
    post,
    path = "/api/v1/gifts",
    request_body = CreateGiftRequest,
    responses(
        (status = 201, description = "Gift created", body = GiftResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "createGift"
)]
#[post("/gifts")]
pub async fn create_gift(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateGiftRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = GiftDraft::try_from(payload.into_inner())?;
    let gift = state.gifts_command.create(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(GiftResponse::from(gift)))
}

/// How often the signed-in user has redeemed a gift.
#[utoipa::path(
    get,
    path = "/api/v1/gifts/{id}/usage",
    params(("id" = i64, Path, description = "Gift id")),
    responses(
        (status = 200, description = "Usage summary", body = GiftUsageSummaryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "giftUsage"
)]
#[get("/gifts/{id}/usage")]
pub async fn gift_usage(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<GiftUsageSummaryResponse>> {
    let user_id = session.require_user_id()?;
    let summary = state
        .gifts
        .usage(&user_id, GiftId::new(path.into_inner()))
        .await?;
    Ok(web::Json(GiftUsageSummaryResponse::from(summary)))
}

/// Redeem a gift, issuing a single-use QR token.
///
/// Eligibility (activity, expiry, age, school type) is checked first; the
/// per-user limit is enforced under a row lock so parallel requests cannot
/// exceed it.
#[utoipa::path(
    post,
    path = "/api/v1/gifts/{id}/use",
    params(("id" = i64, Path, description = "Gift id")),
    responses(
        (status = 201, description = "Gift redeemed", body = GiftUsageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Usage limit reached", body = ErrorSchema),
        (status = 422, description = "Restriction not met", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "redeemGift"
)]
#[post("/gifts/{id}/use")]
pub async fn redeem_gift(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let usage = state
        .gifts_command
        .redeem(&user_id, GiftId::new(path.into_inner()))
        .await?;
    info!(%user_id, gift_id = %usage.gift_id, "gift redeemed");
    Ok(HttpResponse::Created().json(GiftUsageResponse::from(usage)))
}

/// Look up a scanned gift token.
#[utoipa::path(
    post,
    path = "/api/v1/gifts/verify",
    request_body = RedemptionCodeRequest,
    responses(
        (status = 200, description = "Usage and gift", body = GiftUsageWithGiftResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema)
    ),
    tags = ["gifts"],
    operation_id = "verifyGift"
)]
#[post("/gifts/verify")]
pub async fn verify_gift(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RedemptionCodeRequest>,
) -> ApiResult<web::Json<GiftUsageWithGiftResponse>> {
    session.require_user_id()?;
    let code = scanned_code(payload.into_inner())?;
    let usage = state.gifts.verify(&code).await?;
    Ok(web::Json(GiftUsageWithGiftResponse::from(usage)))
}
