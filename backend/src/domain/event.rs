//! Local events and ticket pricing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::content::{
    ContentValidationError, Region, RegionFilter, TITLE_MAX, optional_url, required_text,
};
use crate::domain::UserId;

/// Database identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(i64);

impl EventId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-negative amount in minor units (yen × 100).
///
/// # Examples
/// ```
/// use localconnect::domain::Price;
///
/// let price: Price = "1500.5".parse().expect("valid price");
/// assert_eq!(price.minor_units(), 150_050);
/// assert_eq!(price.to_string(), "1500.50");
/// assert!("1.234".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// Wrap stored minor units; negative values are rejected.
    pub fn from_minor_units(minor: i64) -> Result<Self, ContentValidationError> {
        if minor < 0 {
            return Err(ContentValidationError::InvalidPrice);
        }
        Ok(Self(minor))
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, failing on overflow.
    pub fn checked_mul(self, quantity: u8) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }
}

impl FromStr for Price {
    type Err = ContentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (whole, fraction) = match value.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (value, None),
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || fraction.is_some_and(|f| !all_digits(f) || f.len() > 2) {
            return Err(ContentValidationError::InvalidPrice);
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| ContentValidationError::InvalidPrice)?;
        let cents = match fraction {
            None => 0,
            Some(f) => {
                let digits: i64 = f.parse().map_err(|_| ContentValidationError::InvalidPrice)?;
                if f.len() == 1 { digits * 10 } else { digits }
            }
        };
        whole
            .checked_mul(100)
            .and_then(|minor| minor.checked_add(cents))
            .map(Self)
            .ok_or(ContentValidationError::InvalidPrice)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price: Price,
    pub region: Region,
    pub image_url: Option<String>,
    pub capacity: Option<u32>,
    /// Remaining tickets; `None` means unlimited.
    pub available_tickets: Option<u32>,
    pub organizer_id: Option<UserId>,
}

/// Validated input for creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price: Price,
    pub region: Region,
    pub image_url: Option<String>,
    pub capacity: Option<u32>,
    pub available_tickets: Option<u32>,
    pub organizer_id: Option<UserId>,
}

/// Unvalidated event fields as received from a client.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price: String,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i64>,
    pub available_tickets: Option<i64>,
}

impl NewEvent {
    /// Validate a draft for `organizer_id`.
    pub fn from_draft(
        draft: EventDraft,
        organizer_id: UserId,
    ) -> Result<Self, ContentValidationError> {
        let capacity = draft
            .capacity
            .map(|value| {
                u32::try_from(value)
                    .ok()
                    .filter(|capacity| *capacity >= 1)
                    .ok_or(ContentValidationError::OutOfRange { field: "capacity" })
            })
            .transpose()?;
        let available_tickets = draft
            .available_tickets
            .map(|value| {
                u32::try_from(value).map_err(|_| ContentValidationError::OutOfRange {
                    field: "availableTickets",
                })
            })
            .transpose()?;

        Ok(Self {
            title: required_text("title", &draft.title, Some(TITLE_MAX))?,
            description: required_text("description", &draft.description, None)?,
            event_date: draft.event_date,
            venue: required_text("venue", &draft.venue, Some(TITLE_MAX))?,
            price: draft.price.parse()?,
            region: Region::new(draft.prefecture, draft.city)?,
            image_url: optional_url("imageUrl", draft.image_url)?,
            capacity,
            available_tickets,
            organizer_id: Some(organizer_id),
        })
    }
}

/// Filters for listing events.
pub type EventFilter = RegionFilter;
