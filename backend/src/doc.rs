//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`. Request and response schemas are collected
//! from the handler annotations; the shared error payload is registered here.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "LocalConnect API",
        description = "Community articles, events with tickets, and region-restricted gifts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::create_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::create_event,
        crate::inbound::http::tickets::purchase_tickets,
        crate::inbound::http::tickets::my_tickets,
        crate::inbound::http::tickets::verify_ticket,
        crate::inbound::http::tickets::use_ticket,
        crate::inbound::http::gifts::list_gifts,
        crate::inbound::http::gifts::nearby_gifts,
        crate::inbound::http::gifts::get_gift,
        crate::inbound::http::gifts::create_gift,
        crate::inbound::http::gifts::gift_usage,
        crate::inbound::http::gifts::redeem_gift,
        crate::inbound::http::gifts::verify_gift,
        crate::inbound::http::regions::list_prefectures,
        crate::inbound::http::regions::prefecture_from_address,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Login, logout and the current account"),
        (name = "profile", description = "Demographic profile of the signed-in user"),
        (name = "articles", description = "Regional news articles"),
        (name = "events", description = "Community events"),
        (name = "tickets", description = "Ticket purchase and entry scanning"),
        (name = "gifts", description = "Gifts, nearby search and redemption"),
        (name = "regions", description = "Prefecture lookups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/v1/auth/login", "post")]
    #[case("/api/v1/tickets/use", "post")]
    #[case("/api/v1/gifts/nearby", "get")]
    #[case("/api/v1/gifts/{id}/use", "post")]
    #[case("/api/v1/regions/prefecture", "get")]
    fn documents_endpoint(#[case] path: &str, #[case] method: &str) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise openapi");
        assert!(
            doc["paths"][path][method].is_object(),
            "missing {method} {path}"
        );
    }

    #[test]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
        assert!(components.schemas.contains_key("crate.domain.Error"));
    }
}
