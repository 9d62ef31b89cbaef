//! Server settings loaded via OrthoConfig from CLI flags, environment
//! (`LOCALCONNECT_*`) and configuration files.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use actix_web::cookie::SameSite;
use localconnect::domain::ExternalId;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Invalid values that survive parsing but cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown SameSite policy `{0}`; expected lax, strict or none")]
    SameSite(String),
    #[error("owner external id is invalid: {0}")]
    OwnerExternalId(String),
    #[error("SameSite=None requires secure cookies")]
    InsecureCrossSite,
}

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOCALCONNECT")]
pub struct AppSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it the server runs on fixture ports.
    pub database_url: Option<String>,
    pub db_pool_size: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
    /// External login id granted the `admin` role on login.
    pub owner_external_id: Option<String>,
    pub session_key_file: Option<PathBuf>,
    /// Shared secret the auth gateway signs login bodies with. Logins are
    /// refused while it is unset.
    pub gateway_secret_file: Option<PathBuf>,
    /// Mark session cookies `Secure` unless explicitly disabled.
    pub cookie_insecure: Option<bool>,
    /// `lax`, `strict` or `none`.
    pub same_site: Option<String>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_key: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn cookie_secure(&self) -> bool {
        !self.cookie_insecure.unwrap_or(false)
    }

    /// Parsed SameSite policy, `Lax` when unset.
    ///
    /// # Errors
    /// Unknown policies, and `None` combined with insecure cookies.
    pub fn same_site(&self) -> Result<SameSite, SettingsError> {
        let policy = match self.same_site.as_deref().map(str::trim) {
            None => SameSite::Lax,
            Some(value) if value.eq_ignore_ascii_case("lax") => SameSite::Lax,
            Some(value) if value.eq_ignore_ascii_case("strict") => SameSite::Strict,
            Some(value) if value.eq_ignore_ascii_case("none") => SameSite::None,
            Some(other) => return Err(SettingsError::SameSite(other.to_owned())),
        };
        if policy == SameSite::None && !self.cookie_secure() {
            return Err(SettingsError::InsecureCrossSite);
        }
        Ok(policy)
    }

    pub fn owner_external_id(&self) -> Result<Option<ExternalId>, SettingsError> {
        self.owner_external_id
            .as_deref()
            .map(|raw| {
                ExternalId::new(raw).map_err(|err| SettingsError::OwnerExternalId(err.to_string()))
            })
            .transpose()
    }
}
