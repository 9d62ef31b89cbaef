//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` error whose details name the
//! offending request field and a stable `code`.

use chrono::{DateTime, Utc};
use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{
    ArticleCategory, Error, GeoPoint, GeoValidationError, RedemptionCode, RedemptionCodeError,
    TicketQuantity, TicketQuantityError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    OutOfRange,
    TooLong,
    UnknownValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::TooLong => "too_long",
            ErrorCode::UnknownValue => "unknown_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Validate `limit`/`offset` query parameters.
pub(crate) fn parse_page(limit: Option<u32>, offset: Option<i64>) -> Result<PageRequest, Error> {
    PageRequest::new(limit, offset).map_err(|err| {
        let field = match err {
            PageRequestError::LimitTooSmall | PageRequestError::LimitTooLarge { .. } => {
                FieldName::new("limit")
            }
            PageRequestError::NegativeOffset { .. } => FieldName::new("offset"),
        };
        ValidationError::new(field, err.to_string()).with_code(ErrorCode::OutOfRange)
    })
}

pub(crate) fn parse_category(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<ArticleCategory>, Error> {
    value
        .map(|raw| {
            raw.parse::<ArticleCategory>().map_err(|err| {
                ValidationError::new(field, err.to_string())
                    .with_value(ErrorCode::UnknownValue, raw.as_str())
            })
        })
        .transpose()
}

pub(crate) fn parse_quantity(
    value: Option<i64>,
    field: FieldName,
) -> Result<TicketQuantity, Error> {
    TicketQuantity::new(value.unwrap_or(1)).map_err(|err: TicketQuantityError| {
        ValidationError::new(field, err.to_string()).with_code(ErrorCode::OutOfRange)
    })
}

pub(crate) fn parse_redemption_code(
    value: &str,
    field: FieldName,
) -> Result<RedemptionCode, Error> {
    RedemptionCode::new(value).map_err(|err| {
        let code = match err {
            RedemptionCodeError::Empty => ErrorCode::MissingField,
            RedemptionCodeError::TooLong { .. } => ErrorCode::TooLong,
        };
        ValidationError::new(field, err.to_string()).with_code(code)
    })
}

pub(crate) fn parse_point(latitude: f64, longitude: f64) -> Result<GeoPoint, Error> {
    GeoPoint::new(latitude, longitude).map_err(|err| {
        let field = match err {
            GeoValidationError::LatitudeOutOfRange(_) => FieldName::new("latitude"),
            GeoValidationError::LongitudeOutOfRange(_) => FieldName::new("longitude"),
        };
        ValidationError::new(field, err.to_string()).with_code(ErrorCode::OutOfRange)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case(Some(0), None, "limit")]
    #[case(Some(101), None, "limit")]
    #[case(None, Some(-1), "offset")]
    fn page_errors_name_the_field(
        #[case] limit: Option<u32>,
        #[case] offset: Option<i64>,
        #[case] field: &str,
    ) {
        let err = parse_page(limit, offset).expect_err("invalid page");
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some("out_of_range"));
    }

    #[rstest]
    fn missing_quantity_defaults_to_one() {
        let quantity = parse_quantity(None, FieldName::new("quantity")).expect("default");
        assert_eq!(quantity.get(), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(11)]
    fn quantity_outside_bounds_is_rejected(#[case] raw: i64) {
        let err = parse_quantity(Some(raw), FieldName::new("quantity")).expect_err("invalid");
        assert_eq!(detail(&err, "field"), Some("quantity"));
    }

    #[rstest]
    fn unknown_category_reports_value() {
        let err = parse_category(Some("gossip".into()), FieldName::new("category"))
            .expect_err("unknown category");
        assert_eq!(detail(&err, "code"), Some("unknown_value"));
        assert_eq!(detail(&err, "value"), Some("gossip"));
    }

    #[rstest]
    fn blank_code_is_missing() {
        let err = parse_redemption_code("  ", FieldName::new("qrCode")).expect_err("blank");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    fn bad_latitude_names_latitude() {
        let err = parse_point(95.0, 0.0).expect_err("out of range");
        assert_eq!(detail(&err, "field"), Some("latitude"));
    }

    #[rstest]
    fn timestamps_must_be_rfc3339() {
        let err = parse_rfc3339_timestamp("next friday".into(), FieldName::new("eventDate"))
            .expect_err("not a timestamp");
        assert_eq!(detail(&err, "code"), Some("invalid_timestamp"));
        assert!(missing_field_error(FieldName::new("eventDate"))
            .message()
            .contains("eventDate"));
    }
}
