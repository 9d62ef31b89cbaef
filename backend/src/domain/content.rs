//! Field rules shared by articles, events, and gifts.

use serde_json::json;
use url::Url;

use crate::domain::Error;

/// Maximum length of titles, venues, and store names.
pub const TITLE_MAX: usize = 255;
/// Maximum length of a prefecture name.
pub const REGION_PREFECTURE_MAX: usize = 50;
/// Maximum length of a city name.
pub const REGION_CITY_MAX: usize = 100;

/// Validation failures for content fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be an absolute URL")]
    InvalidUrl { field: &'static str },
    #[error("{field} has unsupported value {value:?}")]
    UnknownValue { field: &'static str, value: String },
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },
    #[error("price must be a decimal with at most two fraction digits")]
    InvalidPrice,
}

impl ContentValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidUrl { field }
            | Self::UnknownValue { field, .. }
            | Self::OutOfRange { field } => field,
            Self::InvalidPrice => "price",
        }
    }

    /// Stable machine-readable reason.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty",
            Self::TooLong { .. } => "too_long",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::UnknownValue { .. } => "unknown_value",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidPrice => "invalid_price",
        }
    }
}

impl From<ContentValidationError> for Error {
    fn from(err: ContentValidationError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        }))
    }
}

/// Require non-blank text of at most `max` characters.
pub fn required_text(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<String, ContentValidationError> {
    if value.trim().is_empty() {
        return Err(ContentValidationError::Empty { field });
    }
    if let Some(max) = max.filter(|max| value.chars().count() > *max) {
        return Err(ContentValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

/// Limit optional text to `max` characters.
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ContentValidationError> {
    match value {
        Some(text) if text.chars().count() > max => {
            Err(ContentValidationError::TooLong { field, max })
        }
        other => Ok(other),
    }
}

/// Accept only absolute URLs for optional image links.
pub fn optional_url(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ContentValidationError> {
    value
        .map(|raw| {
            Url::parse(&raw)
                .map(|_| raw)
                .map_err(|_| ContentValidationError::InvalidUrl { field })
        })
        .transpose()
}

/// Region fields shared by every content type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub prefecture: Option<String>,
    pub city: Option<String>,
}

impl Region {
    /// Validate region lengths.
    pub fn new(
        prefecture: Option<String>,
        city: Option<String>,
    ) -> Result<Self, ContentValidationError> {
        Ok(Self {
            prefecture: optional_text("prefecture", prefecture, REGION_PREFECTURE_MAX)?,
            city: optional_text("city", city, REGION_CITY_MAX)?,
        })
    }
}

/// Optional prefecture and city filters for list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter {
    pub prefecture: Option<String>,
    pub city: Option<String>,
}

impl RegionFilter {
    /// Whether `region` satisfies every set filter.
    pub fn matches(&self, prefecture: Option<&str>, city: Option<&str>) -> bool {
        let prefecture_ok = self
            .prefecture
            .as_deref()
            .is_none_or(|wanted| prefecture == Some(wanted));
        let city_ok = self
            .city
            .as_deref()
            .is_none_or(|wanted| city == Some(wanted));
        prefecture_ok && city_ok
    }
}
