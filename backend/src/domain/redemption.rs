//! Single-use redemption tokens for tickets and gift claims.
//!
//! A token is the opaque string rendered into a QR code. It concatenates the
//! target id, the principal, a millisecond timestamp, and 8 random bytes so
//! that tokens never collide in practice; uniqueness is still enforced by the
//! store.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde_json::json;

use crate::domain::{Error, UserId};

/// Maximum stored length of a redemption token.
pub const REDEMPTION_CODE_MAX: usize = 255;

/// What a token redeems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedemptionKind {
    Ticket,
    Gift,
}

impl RedemptionKind {
    /// Token prefix for this kind.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Ticket => "TICKET",
            Self::Gift => "GIFT",
        }
    }
}

/// Errors raised when parsing a presented token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedemptionCodeError {
    #[error("redemption code must not be empty")]
    Empty,
    #[error("redemption code must be at most {max} characters")]
    TooLong { max: usize },
}

/// Opaque single-use token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RedemptionCode(String);

impl RedemptionCode {
    /// Accept a token presented by a client.
    pub fn new(value: impl AsRef<str>) -> Result<Self, RedemptionCodeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RedemptionCodeError::Empty);
        }
        if trimmed.len() > REDEMPTION_CODE_MAX {
            return Err(RedemptionCodeError::TooLong {
                max: REDEMPTION_CODE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Build a token from its parts.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use localconnect::domain::{RedemptionCode, RedemptionKind, UserId};
    ///
    /// let user = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// let at = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("valid time");
    /// let code = RedemptionCode::from_parts(RedemptionKind::Gift, 7, &user, at, [0xab; 8]);
    /// assert_eq!(
    ///     code.as_ref(),
    ///     "GIFT-7-3fa85f64-5717-4562-b3fc-2c963f66afa6-1700000000000-abababababababab"
    /// );
    /// ```
    pub fn from_parts(
        kind: RedemptionKind,
        target_id: i64,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
        nonce: [u8; 8],
    ) -> Self {
        Self(format!(
            "{}-{}-{}-{}-{}",
            kind.prefix(),
            target_id,
            user_id,
            issued_at.timestamp_millis(),
            hex::encode(nonce)
        ))
    }

    /// Issue a fresh token with a random suffix.
    pub fn issue(
        kind: RedemptionKind,
        target_id: i64,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let mut nonce = [0_u8; 8];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::from_parts(kind, target_id, user_id, issued_at, nonce)
    }

    pub fn kind(&self) -> Option<RedemptionKind> {
        [RedemptionKind::Ticket, RedemptionKind::Gift]
            .into_iter()
            .find(|kind| {
                self.0
                    .strip_prefix(kind.prefix())
                    .is_some_and(|rest| rest.starts_with('-'))
            })
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for RedemptionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedemptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed failures of ticket purchase and gift redemption.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedemptionError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("this code has already been used")]
    AlreadyUsed { used_at: Option<DateTime<Utc>> },
    #[error("only {available} tickets remain, {requested} requested")]
    InsufficientInventory { requested: u32, available: u32 },
    #[error("usage limit of {limit} reached")]
    UsageLimitReached { limit: u32, used: u32 },
    #[error("this gift requires age {required} or older")]
    AgeRestriction { required: u8, actual: Option<u8> },
    #[error("this gift is limited to {required} users")]
    SchoolTypeRestriction {
        required: &'static str,
        actual: Option<&'static str>,
    },
    #[error("this gift expired")]
    Expired { expired_at: DateTime<Utc> },
    #[error("this gift is no longer active")]
    Inactive,
    #[error("redemption temporarily unavailable: {message}")]
    Transient { message: String },
}

impl RedemptionError {
    /// Stable machine-readable reason placed in error details.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::AlreadyUsed { .. } => "already_used",
            Self::InsufficientInventory { .. } => "insufficient_inventory",
            Self::UsageLimitReached { .. } => "usage_limit_reached",
            Self::AgeRestriction { .. } => "age_restriction",
            Self::SchoolTypeRestriction { .. } => "school_type_restriction",
            Self::Expired { .. } => "expired",
            Self::Inactive => "inactive",
            Self::Transient { .. } => "transient",
        }
    }
}

impl From<RedemptionError> for Error {
    fn from(value: RedemptionError) -> Self {
        let message = value.to_string();
        let code = value.reason();
        match value {
            RedemptionError::NotFound { entity } => {
                Error::not_found(message).with_details(json!({ "code": code, "entity": entity }))
            }
            RedemptionError::AlreadyUsed { used_at } => {
                Error::conflict(message).with_details(json!({ "code": code, "usedAt": used_at }))
            }
            RedemptionError::InsufficientInventory {
                requested,
                available,
            } => Error::inventory_exhausted(message).with_details(json!({
                "code": code,
                "requested": requested,
                "available": available,
            })),
            RedemptionError::UsageLimitReached { limit, used } => Error::inventory_exhausted(
                message,
            )
            .with_details(json!({ "code": code, "usageLimit": limit, "usageCount": used })),
            RedemptionError::AgeRestriction { required, actual } => Error::restriction_violation(
                message,
            )
            .with_details(json!({ "code": code, "required": required, "actual": actual })),
            RedemptionError::SchoolTypeRestriction { required, actual } => {
                Error::restriction_violation(message).with_details(json!({
                    "code": code,
                    "required": required,
                    "actual": actual,
                }))
            }
            RedemptionError::Expired { expired_at } => Error::restriction_violation(message)
                .with_details(json!({ "code": code, "expiredAt": expired_at })),
            RedemptionError::Inactive => {
                Error::restriction_violation(message).with_details(json!({ "code": code }))
            }
            RedemptionError::Transient { .. } => {
                Error::service_unavailable(message).with_details(json!({ "code": code }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::collections::HashSet;

    fn user() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id")
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_767_225_600_123)
            .single()
            .expect("valid time")
    }

    #[test]
    fn ticket_token_has_expected_layout() {
        let code = RedemptionCode::issue(RedemptionKind::Ticket, 42, &user(), issued_at());
        let text = code.as_ref();
        let prefix = "TICKET-42-3fa85f64-5717-4562-b3fc-2c963f66afa6-1767225600123-";
        assert!(text.starts_with(prefix), "unexpected token {text}");
        let suffix = &text[prefix.len()..];
        assert_eq!(suffix.len(), 16);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
        assert_eq!(code.kind(), Some(RedemptionKind::Ticket));
        assert!(text.len() <= REDEMPTION_CODE_MAX);
    }

    #[test]
    fn issued_tokens_are_unique() {
        let codes: HashSet<_> = (0..500)
            .map(|_| RedemptionCode::issue(RedemptionKind::Gift, 1, &user(), issued_at()))
            .collect();
        assert_eq!(codes.len(), 500);
    }

    #[test]
    fn worst_case_token_fits_column() {
        let code = RedemptionCode::from_parts(
            RedemptionKind::Ticket,
            i64::MAX,
            &user(),
            issued_at(),
            [0xff; 8],
        );
        assert!(code.as_ref().len() <= REDEMPTION_CODE_MAX);
        assert!(RedemptionCode::new(code.as_ref()).is_ok());
    }

    #[rstest]
    #[case("", RedemptionCodeError::Empty)]
    #[case("   ", RedemptionCodeError::Empty)]
    fn rejects_blank_codes(#[case] raw: &str, #[case] expected: RedemptionCodeError) {
        assert_eq!(RedemptionCode::new(raw), Err(expected));
    }

    #[test]
    fn rejects_overlong_codes() {
        let raw = "G".repeat(REDEMPTION_CODE_MAX + 1);
        assert!(matches!(
            RedemptionCode::new(raw),
            Err(RedemptionCodeError::TooLong { .. })
        ));
    }

    #[test]
    fn unknown_prefix_has_no_kind() {
        let code = RedemptionCode::new("GIFTED-1").expect("non-empty");
        assert_eq!(code.kind(), None);
    }

    #[rstest]
    #[case(RedemptionError::NotFound { entity: "ticket" }, ErrorCode::NotFound)]
    #[case(RedemptionError::AlreadyUsed { used_at: None }, ErrorCode::Conflict)]
    #[case(
        RedemptionError::InsufficientInventory { requested: 3, available: 1 },
        ErrorCode::InventoryExhausted
    )]
    #[case(
        RedemptionError::UsageLimitReached { limit: 1, used: 1 },
        ErrorCode::InventoryExhausted
    )]
    #[case(
        RedemptionError::AgeRestriction { required: 20, actual: Some(18) },
        ErrorCode::RestrictionViolation
    )]
    #[case(
        RedemptionError::SchoolTypeRestriction { required: "university", actual: None },
        ErrorCode::RestrictionViolation
    )]
    #[case(RedemptionError::Inactive, ErrorCode::RestrictionViolation)]
    #[case(
        RedemptionError::Transient { message: "pool".into() },
        ErrorCode::ServiceUnavailable
    )]
    fn maps_to_error_codes(#[case] error: RedemptionError, #[case] expected: ErrorCode) {
        let reason = error.reason();
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), expected);
        let details = mapped.details().expect("details present");
        assert_eq!(details["code"], reason);
    }
}
