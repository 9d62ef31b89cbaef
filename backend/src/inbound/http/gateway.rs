//! Login assertions forwarded by the auth gateway.
//!
//! The gateway completes the OAuth handshake, then signs the exact login
//! body with HMAC-SHA256 over a shared secret and sends the hex digest in
//! the `x-gateway-signature` header. A body whose `issuedAt` is more than
//! five minutes away from the server clock is refused, which bounds replay.
//! Without a configured secret every login is refused.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use mockable::{Clock, DefaultClock};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::Error;

type HmacSha256 = Hmac<Sha256>;

pub const GATEWAY_SIGNATURE_HEADER: &str = "x-gateway-signature";
pub const MIN_SECRET_LEN: usize = 32;
const MAX_ASSERTION_AGE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewaySecretError {
    #[error("gateway secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    TooShort(usize),
}

fn rejected(code: &'static str, message: &str) -> Error {
    Error::unauthorized(message).with_details(json!({ "code": code }))
}

/// Checks gateway signatures and assertion freshness.
pub struct GatewayVerifier {
    secret: Option<Zeroizing<Vec<u8>>>,
    clock: Arc<dyn Clock>,
}

impl GatewayVerifier {
    /// # Errors
    /// [`GatewaySecretError::TooShort`] for secrets under [`MIN_SECRET_LEN`].
    pub fn new(secret: Vec<u8>, clock: Arc<dyn Clock>) -> Result<Self, GatewaySecretError> {
        let secret = Zeroizing::new(secret);
        if secret.len() < MIN_SECRET_LEN {
            return Err(GatewaySecretError::TooShort(secret.len()));
        }
        Ok(Self {
            secret: Some(secret),
            clock,
        })
    }

    /// Refuses every login.
    pub fn disabled() -> Self {
        Self {
            secret: None,
            clock: Arc::new(DefaultClock),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check `signature` (hex HMAC-SHA256) against the raw request body.
    ///
    /// # Errors
    /// `401 Unauthorized` with `details.code` set to `login_disabled`,
    /// `missing_signature` or `bad_signature`.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), Error> {
        let Some(secret) = self.secret.as_ref() else {
            return Err(rejected("login_disabled", "login is not configured"));
        };
        let signature = signature
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| rejected("missing_signature", "gateway signature required"))?;
        let expected = hex::decode(signature)
            .map_err(|_| rejected("bad_signature", "gateway signature is invalid"))?;

        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|err| Error::internal(format!("gateway key rejected: {err}")))?;
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| rejected("bad_signature", "gateway signature is invalid"))
    }

    /// # Errors
    /// `401 Unauthorized` with `details.code = "stale_assertion"` when
    /// `issued_at` is outside the accepted window.
    pub fn check_freshness(&self, issued_at: DateTime<Utc>) -> Result<(), Error> {
        let skew = self.clock.utc().signed_duration_since(issued_at).abs();
        if skew > Duration::seconds(MAX_ASSERTION_AGE_SECS) {
            return Err(rejected("stale_assertion", "login assertion has expired"));
        }
        Ok(())
    }

    /// Hex signature for `body`, as the gateway would send it.
    #[cfg(test)]
    pub(crate) fn sign(&self, body: &[u8]) -> String {
        let secret = self.secret.as_ref().expect("enabled verifier");
        let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Local, TimeZone};

    pub(crate) struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    pub(crate) fn gateway_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(crate) fn test_gateway() -> GatewayVerifier {
        GatewayVerifier::new(vec![42; MIN_SECRET_LEN], Arc::new(FixedClock(gateway_now())))
            .expect("valid secret")
    }
}
