//! Event API handlers.
//!
//! ```text
//! GET /api/v1/events?prefecture=東京都&limit=20
//! GET /api/v1/events/{id}
//! POST /api/v1/events {"title":"Summer market","eventDate":"2026-08-01T10:00:00Z",...}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, EventDraft, EventId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{EventResponse, PageResponse, RegionPageQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_page, parse_rfc3339_timestamp,
};

/// Request body for `POST /api/v1/events`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "2026-08-01T10:00:00Z")]
    pub event_date: Option<String>,
    pub venue: Option<String>,
    /// Decimal yen amount; free when omitted.
    #[schema(example = "1500")]
    pub price: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i64>,
    /// Tickets on sale; omit for unlimited.
    pub available_tickets: Option<i64>,
}

impl TryFrom<CreateEventRequest> for EventDraft {
    type Error = Error;

    fn try_from(value: CreateEventRequest) -> Result<Self, Self::Error> {
        let required = |field: Option<String>, name: &'static str| {
            field.ok_or_else(|| missing_field_error(FieldName::new(name)))
        };
        let event_date = parse_rfc3339_timestamp(
            required(value.event_date, "eventDate")?,
            FieldName::new("eventDate"),
        )?;
        Ok(Self {
            title: required(value.title, "title")?,
            description: required(value.description, "description")?,
            event_date,
            venue: required(value.venue, "venue")?,
            price: value.price.unwrap_or_else(|| "0".to_owned()),
            prefecture: value.prefecture,
            city: value.city,
            image_url: value.image_url,
            capacity: value.capacity,
            available_tickets: value.available_tickets,
        })
    }
}

/// List events, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(RegionPageQuery),
    responses(
        (status = 200, description = "Events", body = PageResponse<EventResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    query: web::Query<RegionPageQuery>,
) -> ApiResult<web::Json<PageResponse<EventResponse>>> {
    let page = parse_page(query.limit, query.offset)?;
    let events = state.events.list(query.region(), page).await?;
    Ok(web::Json(PageResponse::from_page(events)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security([])
)]
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<EventResponse>> {
    let event = state.events.get(EventId::new(path.into_inner())).await?;
    Ok(web::Json(EventResponse::from(event)))
}

/// Schedule an event. Requires the `create_events` permission.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = EventDraft::try_from(payload.into_inner())?;
    let event = state.events_command.create(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(EventResponse::from(event)))
}
