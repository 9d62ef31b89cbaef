//! Build the HTTP port bundle from the configured persistence layer.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use localconnect::domain::{
    AccountService, ArticleService, EventService, ExternalId, GiftService, ProfileService,
    TicketService,
};
use localconnect::inbound::http::state::HttpState;
use localconnect::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselEventRepository, DieselGiftRepository,
    DieselTicketRepository, DieselUserProfileRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wire Diesel repositories into the domain services.
///
/// Each service implements both halves of its query/command split, so one
/// instance backs both fields in [`HttpState`].
fn database_state(pool: &DbPool, owner: Option<ExternalId>) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let profiles = Arc::new(DieselUserProfileRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(users.clone(), clock.clone()).with_owner(owner));
    let profile = Arc::new(ProfileService::new(profiles.clone(), clock.clone()));
    let articles = Arc::new(ArticleService::new(
        Arc::new(DieselArticleRepository::new(pool.clone())),
        users.clone(),
        clock.clone(),
    ));
    let events = Arc::new(EventService::new(
        Arc::new(DieselEventRepository::new(pool.clone())),
        users.clone(),
    ));
    let tickets = Arc::new(TicketService::new(
        Arc::new(DieselTicketRepository::new(pool.clone())),
        clock.clone(),
    ));
    let gifts = Arc::new(GiftService::new(
        Arc::new(DieselGiftRepository::new(pool.clone())),
        profiles,
        users,
        clock,
    ));

    HttpState {
        login: accounts.clone(),
        users: accounts,
        profile: profile.clone(),
        profile_command: profile,
        articles: articles.clone(),
        articles_command: articles,
        events: events.clone(),
        events_command: events,
        tickets: tickets.clone(),
        tickets_command: tickets,
        gifts: gifts.clone(),
        gifts_command: gifts,
    }
}

/// Database-backed state when a pool is configured, fixtures otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => database_state(pool, config.owner_external_id.clone()),
        None => HttpState::fixtures(),
    };
    web::Data::new(state)
}
