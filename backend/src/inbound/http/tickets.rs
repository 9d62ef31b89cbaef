//! Ticket API handlers.
//!
//! ```text
//! POST /api/v1/tickets {"eventId":4,"quantity":2}
//! GET /api/v1/tickets/mine
//! POST /api/v1/tickets/verify {"qrCode":"TICKET-4-..."}
//! POST /api/v1/tickets/use {"qrCode":"TICKET-4-..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, EventId, RedemptionCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{RedemptionCodeRequest, TicketResponse, TicketWithEventResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_quantity, parse_redemption_code,
};

/// Request body for `POST /api/v1/tickets`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTicketRequest {
    pub event_id: Option<i64>,
    /// Admissions to buy, 1 to 10; defaults to 1.
    #[schema(example = 2)]
    pub quantity: Option<i64>,
}

pub(crate) fn scanned_code(payload: RedemptionCodeRequest) -> Result<RedemptionCode, Error> {
    let field = FieldName::new("qrCode");
    let raw = payload.qr_code.ok_or_else(|| missing_field_error(field))?;
    parse_redemption_code(&raw, field)
}

/// Buy tickets for an event.
///
/// Availability is checked and decremented atomically; a purchase that
/// cannot be covered fails with `inventory_exhausted` and changes nothing.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = PurchaseTicketRequest,
    responses(
        (status = 201, description = "Tickets purchased", body = TicketResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 409, description = "Not enough tickets left", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "purchaseTickets"
)]
#[post("/tickets")]
pub async fn purchase_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PurchaseTicketRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let event_id = payload
        .event_id
        .map(EventId::new)
        .ok_or_else(|| missing_field_error(FieldName::new("eventId")))?;
    let quantity = parse_quantity(payload.quantity, FieldName::new("quantity"))?;
    let ticket = state
        .tickets_command
        .purchase(&user_id, event_id, quantity)
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

/// Tickets bought by the signed-in user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/mine",
    responses(
        (status = 200, description = "Tickets with their events", body = [TicketWithEventResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "myTickets"
)]
#[get("/tickets/mine")]
pub async fn my_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TicketWithEventResponse>>> {
    let user_id = session.require_user_id()?;
    let tickets = state.tickets.mine(&user_id).await?;
    Ok(web::Json(
        tickets.into_iter().map(TicketWithEventResponse::from).collect(),
    ))
}

/// Look up a scanned ticket without using it.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/verify",
    request_body = RedemptionCodeRequest,
    responses(
        (status = 200, description = "Ticket and event", body = TicketWithEventResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "verifyTicket"
)]
#[post("/tickets/verify")]
pub async fn verify_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RedemptionCodeRequest>,
) -> ApiResult<web::Json<TicketWithEventResponse>> {
    session.require_user_id()?;
    let code = scanned_code(payload.into_inner())?;
    let ticket = state.tickets.verify(&code).await?;
    Ok(web::Json(TicketWithEventResponse::from(ticket)))
}

/// Admit a ticket holder. A ticket can be used once.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/use",
    request_body = RedemptionCodeRequest,
    responses(
        (status = 200, description = "Ticket marked used", body = TicketWithEventResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema),
        (status = 409, description = "Already used", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "useTicket"
)]
#[post("/tickets/use")]
pub async fn use_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RedemptionCodeRequest>,
) -> ApiResult<web::Json<TicketWithEventResponse>> {
    let staff_id = session.require_user_id()?;
    let code = scanned_code(payload.into_inner())?;
    let ticket = state.tickets_command.use_ticket(&code).await?;
    info!(%staff_id, ticket_id = %ticket.ticket.id, "ticket admitted");
    Ok(web::Json(TicketWithEventResponse::from(ticket)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{Value, json};

    use crate::domain::ports::{MockTicketsCommand, MockTicketsQuery};
    use crate::domain::{
        Event, Price, RedemptionError, RedemptionKind, Region, Ticket, TicketId, TicketQuantity,
        TicketWithEvent, UserId,
    };
    use crate::inbound::http::test_utils::{session_cookie, test_app};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn buyer() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id")
    }

    fn ticket(quantity: TicketQuantity, used_at: Option<DateTime<Utc>>) -> Ticket {
        Ticket {
            id: TicketId::new(11),
            user_id: buyer(),
            event_id: EventId::new(4),
            qr_code: RedemptionCode::from_parts(RedemptionKind::Ticket, 4, &buyer(), at(9), [7; 8]),
            quantity,
            total_price: Price::from_minor_units(300_000).expect("valid price"),
            used_at,
            purchased_at: at(9),
        }
    }

    fn with_event(ticket: Ticket) -> TicketWithEvent {
        TicketWithEvent {
            ticket,
            event: Event {
                id: EventId::new(4),
                title: "Summer market".to_owned(),
                description: "Local produce".to_owned(),
                event_date: at(10),
                venue: "Town hall".to_owned(),
                price: Price::from_minor_units(150_000).expect("valid price"),
                region: Region::default(),
                image_url: None,
                capacity: None,
                available_tickets: None,
                organizer_id: None,
            },
        }
    }

    #[actix_web::test]
    async fn purchase_defaults_quantity_to_one() {
        let mut command = MockTicketsCommand::new();
        command
            .expect_purchase()
            .withf(|_, event_id, quantity| event_id.get() == 4 && quantity.get() == 1)
            .times(1)
            .returning(|_, _, quantity| Ok(ticket(quantity, None)));
        let state = HttpState {
            tickets_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(purchase_tickets)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie)
                .set_json(json!({"eventId": 4}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["totalPrice"], "3000.00");
        assert_eq!(body["isUsed"], false);
        assert!(body["qrCode"]
            .as_str()
            .is_some_and(|code| code.starts_with("TICKET-4-")));
    }

    #[actix_web::test]
    async fn sold_out_purchase_is_conflict() {
        let mut command = MockTicketsCommand::new();
        command.expect_purchase().times(1).returning(|_, _, _| {
            Err(RedemptionError::InsufficientInventory {
                requested: 3,
                available: 1,
            }
            .into())
        });
        let state = HttpState {
            tickets_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(purchase_tickets)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie)
                .set_json(json!({"eventId": 4, "quantity": 3}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "inventory_exhausted");
    }

    #[actix_web::test]
    async fn purchase_rejects_quantity_above_ten() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures())
                .service(web::scope("/api/v1").service(purchase_tickets)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets")
                .cookie(cookie)
                .set_json(json!({"eventId": 4, "quantity": 11}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "quantity");
    }

    #[actix_web::test]
    async fn mine_requires_session() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(my_tickets)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/tickets/mine").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn mine_lists_tickets_with_events() {
        let mut query = MockTicketsQuery::new();
        query.expect_mine().times(1).returning(|_| {
            let quantity = TicketQuantity::new(2).expect("valid quantity");
            Ok(vec![with_event(ticket(quantity, None))])
        });
        let state = HttpState {
            tickets: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(my_tickets)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/tickets/mine")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body[0]["ticket"]["quantity"], 2);
        assert_eq!(body[0]["event"]["title"], "Summer market");
    }

    #[actix_web::test]
    async fn second_use_is_conflict() {
        let mut command = MockTicketsCommand::new();
        command.expect_use_ticket().times(1).returning(|_| {
            Err(RedemptionError::AlreadyUsed {
                used_at: Some(at(11)),
            }
            .into())
        });
        let state = HttpState {
            tickets_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(use_ticket)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets/use")
                .cookie(cookie)
                .set_json(json!({"qrCode": "TICKET-4-x"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn verify_requires_qr_code() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(verify_ticket)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets/verify")
                .cookie(cookie)
                .set_json(json!({}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "qrCode");
    }

    #[actix_web::test]
    async fn verify_returns_used_state() {
        let mut query = MockTicketsQuery::new();
        query
            .expect_verify()
            .withf(|code| code.as_ref() == "TICKET-4-abc")
            .times(1)
            .returning(|_| {
                let quantity = TicketQuantity::new(1).expect("valid quantity");
                Ok(with_event(ticket(quantity, Some(at(11)))))
            });
        let state = HttpState {
            tickets: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(verify_ticket)),
        )
        .await;
        let cookie = session_cookie(&app, &buyer()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets/verify")
                .cookie(cookie)
                .set_json(json!({"qrCode": " TICKET-4-abc "}))
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["ticket"]["isUsed"], true);
    }
}
