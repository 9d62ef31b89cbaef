//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, SessionCookie};

#[cfg(feature = "metrics")]
pub(crate) use metrics::default_metrics;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use localconnect::Trace;
#[cfg(debug_assertions)]
use localconnect::doc::ApiDoc;
use localconnect::inbound::http::articles::{create_article, get_article, list_articles};
use localconnect::inbound::http::auth::{login, logout, me};
use localconnect::inbound::http::events::{create_event, get_event, list_events};
use localconnect::inbound::http::gateway::GatewayVerifier;
use localconnect::inbound::http::gifts::{
    create_gift, get_gift, gift_usage, list_gifts, nearby_gifts, redeem_gift, verify_gift,
};
use localconnect::inbound::http::health::{HealthState, live, ready};
use localconnect::inbound::http::profile::{create_profile, get_profile, update_profile};
use localconnect::inbound::http::regions::{list_prefectures, prefecture_from_address};
use localconnect::inbound::http::state::HttpState;
use localconnect::inbound::http::tickets::{my_tickets, purchase_tickets, use_ticket, verify_ticket};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    gateway: web::Data<GatewayVerifier>,
    session: SessionCookie,
}

fn api_scope() -> actix_web::Scope {
    // Literal segments (`nearby`, `verify`, `mine`) register before `{id}`.
    web::scope("/api/v1")
        .service(login)
        .service(logout)
        .service(me)
        .service(get_profile)
        .service(create_profile)
        .service(update_profile)
        .service(list_articles)
        .service(get_article)
        .service(create_article)
        .service(list_events)
        .service(get_event)
        .service(create_event)
        .service(purchase_tickets)
        .service(my_tickets)
        .service(verify_ticket)
        .service(use_ticket)
        .service(list_gifts)
        .service(nearby_gifts)
        .service(verify_gift)
        .service(get_gift)
        .service(create_gift)
        .service(gift_usage)
        .service(redeem_gift)
        .service(list_prefectures)
        .service(prefecture_from_address)
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        gateway,
        session,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(gateway)
        .wrap(Trace)
        .service(api_scope().wrap(session.middleware()))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the process ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        session,
        bind_addr,
        db_pool: _,
        owner_external_id: _,
        gateway,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let gateway = web::Data::new(gateway);

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            gateway: gateway.clone(),
            session: session.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
