//! Values the HTTP server is assembled from.

use std::net::SocketAddr;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use localconnect::domain::ExternalId;
use localconnect::inbound::http::gateway::GatewayVerifier;
use localconnect::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const SESSION_COOKIE: &str = "session";
/// Idle lifetime of a login.
const SESSION_TTL_HOURS: i64 = 2;

/// Encrypted cookie carrying the signed-in account id.
#[derive(Clone)]
pub struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    #[must_use]
    pub fn new(key: Key, secure: bool, same_site: SameSite) -> Self {
        Self {
            key,
            secure,
            same_site,
        }
    }

    /// Private (encrypted) cookie store, refreshed on every response that
    /// touches the session.
    pub(super) fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) session: SessionCookie,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) owner_external_id: Option<ExternalId>,
    pub(crate) gateway: GatewayVerifier,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionCookie, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            owner_external_id: None,
            gateway: GatewayVerifier::disabled(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Serve from PostgreSQL. Without a pool reads come from fixtures and
    /// writes answer `503`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Identity promoted to `admin` whenever it logs in.
    #[must_use]
    pub fn with_owner(mut self, owner: Option<ExternalId>) -> Self {
        self.owner_external_id = owner;
        self
    }

    /// Verifier for gateway-signed logins. Defaults to refusing every login.
    #[must_use]
    pub fn with_gateway(mut self, gateway: GatewayVerifier) -> Self {
        self.gateway = gateway;
        self
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
