//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ArticlesCommand, ArticlesQuery, EventsCommand, EventsQuery, FixtureArticlesCommand,
    FixtureArticlesQuery, FixtureEventsCommand, FixtureEventsQuery, FixtureGiftsCommand,
    FixtureGiftsQuery, FixtureLoginService, FixtureTicketsCommand, FixtureTicketsQuery,
    FixtureUserProfileCommand, FixtureUserProfileQuery, FixtureUsersQuery, GiftsCommand,
    GiftsQuery, LoginService, TicketsCommand, TicketsQuery, UserProfileCommand, UserProfileQuery,
    UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
    pub articles: Arc<dyn ArticlesQuery>,
    pub articles_command: Arc<dyn ArticlesCommand>,
    pub events: Arc<dyn EventsQuery>,
    pub events_command: Arc<dyn EventsCommand>,
    pub tickets: Arc<dyn TicketsQuery>,
    pub tickets_command: Arc<dyn TicketsCommand>,
    pub gifts: Arc<dyn GiftsQuery>,
    pub gifts_command: Arc<dyn GiftsCommand>,
}

impl HttpState {
    /// State backed entirely by fixture ports.
    ///
    /// Every database-backed operation answers `503 Service Unavailable`;
    /// tests override the ports they exercise.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use localconnect::domain::ports::FixtureArticlesQuery;
    /// use localconnect::inbound::http::state::HttpState;
    ///
    /// let state = HttpState {
    ///     articles: Arc::new(FixtureArticlesQuery),
    ///     ..HttpState::fixtures()
    /// };
    /// let _articles = state.articles.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            users: Arc::new(FixtureUsersQuery),
            profile: Arc::new(FixtureUserProfileQuery),
            profile_command: Arc::new(FixtureUserProfileCommand),
            articles: Arc::new(FixtureArticlesQuery),
            articles_command: Arc::new(FixtureArticlesCommand),
            events: Arc::new(FixtureEventsQuery),
            events_command: Arc::new(FixtureEventsCommand),
            tickets: Arc::new(FixtureTicketsQuery),
            tickets_command: Arc::new(FixtureTicketsCommand),
            gifts: Arc::new(FixtureGiftsQuery),
            gifts_command: Arc::new(FixtureGiftsCommand),
        }
    }
}
