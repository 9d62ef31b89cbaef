//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types return the
//! validation message as a `String` so each repository can wrap it in its own
//! query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Age, Article, ArticleId, Event, EventId, ExternalId, GeoPoint, Gift, GiftId, GiftUsage,
    NewArticle, NewEvent, NewGift, Price, RedemptionCode, Region, Ticket, TicketId,
    TicketQuantity, User, UserId, UserProfile, UserUpsert,
};

use super::schema::{
    articles, events, example_data_runs, gift_usages, gifts, tickets, user_profiles, users,
};

fn parse_column<T>(raw: &str, column: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err| format!("invalid {column} {raw:?}: {err}"))
}

fn to_u32(value: i32, column: &str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("negative {column}: {value}"))
}

fn optional_u32(value: Option<i32>, column: &str) -> Result<Option<u32>, String> {
    value.map(|v| to_u32(v, column)).transpose()
}

fn optional_i32(value: Option<u32>, column: &str) -> Result<Option<i32>, String> {
    value
        .map(|v| i32::try_from(v).map_err(|_| format!("{column} overflow: {v}")))
        .transpose()
}

fn optional_age(value: Option<i16>) -> Result<Option<Age>, String> {
    value
        .map(|age| Age::new(i64::from(age)).map_err(|err| err.to_string()))
        .transpose()
}

fn redemption_code(raw: String) -> Result<RedemptionCode, String> {
    RedemptionCode::new(raw).map_err(|err| err.to_string())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: String,
    pub last_signed_in: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            external_id: ExternalId::new(&row.external_id).map_err(|err| err.to_string())?,
            name: row.name,
            email: row.email,
            login_method: row.login_method,
            role: parse_column(&row.role, "role")?,
            last_signed_in: row.last_signed_in,
        })
    }
}

/// Insertable struct for creating or refreshing accounts on login.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub external_id: &'a str,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub login_method: Option<&'a str>,
    pub role: &'a str,
    pub last_signed_in: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_upsert(upsert: &'a UserUpsert) -> Self {
        Self {
            id: *upsert.id.as_uuid(),
            external_id: upsert.identity.external_id.as_ref(),
            name: upsert.identity.name.as_deref(),
            email: upsert.identity.email.as_deref(),
            login_method: upsert.identity.login_method.as_deref(),
            role: upsert.role.unwrap_or_default().as_str(),
            last_signed_in: upsert.signed_in_at,
        }
    }

    pub(crate) fn from_user(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            external_id: user.external_id.as_ref(),
            name: user.name.as_deref(),
            email: user.email.as_deref(),
            login_method: user.login_method.as_deref(),
            role: user.role.as_str(),
            last_signed_in: user.last_signed_in,
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub user_id: Uuid,
    pub age: Option<i16>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    pub school_type: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = String;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::from_uuid(row.user_id),
            age: optional_age(row.age)?,
            gender: row
                .gender
                .as_deref()
                .map(|raw| parse_column(raw, "gender"))
                .transpose()?,
            address: row.address,
            prefecture: row.prefecture,
            city: row.city,
            occupation: row.occupation,
            school_type: row
                .school_type
                .as_deref()
                .map(|raw| parse_column(raw, "school_type"))
                .transpose()?,
            updated_at: row.updated_at,
        })
    }
}

/// Full profile record, used for inserts and whole-row updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_profiles)]
#[diesel(treat_none_as_null = true)]
#[diesel(primary_key(user_id))]
pub(crate) struct UserProfileRecord<'a> {
    pub user_id: Uuid,
    pub age: Option<i16>,
    pub gender: Option<&'a str>,
    pub address: Option<&'a str>,
    pub prefecture: Option<&'a str>,
    pub city: Option<&'a str>,
    pub occupation: Option<&'a str>,
    pub school_type: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a UserProfile> for UserProfileRecord<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            user_id: *profile.user_id.as_uuid(),
            age: profile.age.map(|age| i16::from(age.get())),
            gender: profile.gender.map(|gender| gender.as_str()),
            address: profile.address.as_deref(),
            prefecture: profile.prefecture.as_deref(),
            city: profile.city.as_deref(),
            occupation: profile.occupation.as_deref(),
            school_type: profile.school_type.map(|school| school.as_str()),
            updated_at: profile.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub view_count: i64,
    pub published_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = String;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ArticleId::new(row.id),
            title: row.title,
            content: row.content,
            category: parse_column(&row.category, "category")?,
            region: Region {
                prefecture: row.prefecture,
                city: row.city,
            },
            image_url: row.image_url,
            author_id: row.author_id.map(UserId::from_uuid),
            view_count: row.view_count,
            published_at: row.published_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub prefecture: Option<&'a str>,
    pub city: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub author_id: Option<Uuid>,
    pub published_at: DateTime<Utc>,
}

impl<'a> From<&'a NewArticle> for NewArticleRow<'a> {
    fn from(article: &'a NewArticle) -> Self {
        Self {
            title: &article.title,
            content: &article.content,
            category: article.category.as_str(),
            prefecture: article.region.prefecture.as_deref(),
            city: article.region.city.as_deref(),
            image_url: article.image_url.as_deref(),
            author_id: article.author_id.map(|id| *id.as_uuid()),
            published_at: article.published_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price_minor: i64,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    pub available_tickets: Option<i32>,
    pub organizer_id: Option<Uuid>,
}

impl TryFrom<EventRow> for Event {
    type Error = String;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EventId::new(row.id),
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            venue: row.venue,
            price: Price::from_minor_units(row.price_minor).map_err(|err| err.to_string())?,
            region: Region {
                prefecture: row.prefecture,
                city: row.city,
            },
            image_url: row.image_url,
            capacity: optional_u32(row.capacity, "capacity")?,
            available_tickets: optional_u32(row.available_tickets, "available_tickets")?,
            organizer_id: row.organizer_id.map(UserId::from_uuid),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub event_date: DateTime<Utc>,
    pub venue: &'a str,
    pub price_minor: i64,
    pub prefecture: Option<&'a str>,
    pub city: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub capacity: Option<i32>,
    pub available_tickets: Option<i32>,
    pub organizer_id: Option<Uuid>,
}

impl<'a> TryFrom<&'a NewEvent> for NewEventRow<'a> {
    type Error = String;

    fn try_from(event: &'a NewEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            title: &event.title,
            description: &event.description,
            event_date: event.event_date,
            venue: &event.venue,
            price_minor: event.price.minor_units(),
            prefecture: event.region.prefecture.as_deref(),
            city: event.region.city.as_deref(),
            image_url: event.image_url.as_deref(),
            capacity: optional_i32(event.capacity, "capacity")?,
            available_tickets: optional_i32(event.available_tickets, "available_tickets")?,
            organizer_id: event.organizer_id.map(|id| *id.as_uuid()),
        })
    }
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: i64,
    pub user_id: Uuid,
    pub event_id: i64,
    pub qr_code: String,
    pub quantity: i32,
    pub total_price_minor: i64,
    pub used_at: Option<DateTime<Utc>>,
    pub purchased_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = String;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TicketId::new(row.id),
            user_id: UserId::from_uuid(row.user_id),
            event_id: EventId::new(row.event_id),
            qr_code: redemption_code(row.qr_code)?,
            quantity: TicketQuantity::new(i64::from(row.quantity))
                .map_err(|err| err.to_string())?,
            total_price: Price::from_minor_units(row.total_price_minor)
                .map_err(|err| err.to_string())?,
            used_at: row.used_at,
            purchased_at: row.purchased_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow<'a> {
    pub user_id: Uuid,
    pub event_id: i64,
    pub qr_code: &'a str,
    pub quantity: i32,
    pub total_price_minor: i64,
    pub purchased_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Gifts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gifts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GiftRow {
    pub id: i64,
    pub store_name: String,
    pub gift_title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub usage_limit: i32,
    pub age_restriction: Option<i16>,
    pub school_type_restriction: String,
    pub is_active: bool,
}

impl TryFrom<GiftRow> for Gift {
    type Error = String;

    fn try_from(row: GiftRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: GiftId::new(row.id),
            store_name: row.store_name,
            gift_title: row.gift_title,
            description: row.description,
            location: GeoPoint::new(row.latitude, row.longitude).map_err(|err| err.to_string())?,
            address: row.address,
            region: Region {
                prefecture: row.prefecture,
                city: row.city,
            },
            image_url: row.image_url,
            expiry_date: row.expiry_date,
            usage_limit: to_u32(row.usage_limit, "usage_limit")?,
            age_restriction: optional_age(row.age_restriction)?,
            school_type_restriction: parse_column(
                &row.school_type_restriction,
                "school_type_restriction",
            )?,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gifts)]
pub(crate) struct NewGiftRow<'a> {
    pub store_name: &'a str,
    pub gift_title: &'a str,
    pub description: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<&'a str>,
    pub prefecture: Option<&'a str>,
    pub city: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub usage_limit: i32,
    pub age_restriction: Option<i16>,
    pub school_type_restriction: &'a str,
}

impl<'a> TryFrom<&'a NewGift> for NewGiftRow<'a> {
    type Error = String;

    fn try_from(gift: &'a NewGift) -> Result<Self, Self::Error> {
        Ok(Self {
            store_name: &gift.store_name,
            gift_title: &gift.gift_title,
            description: &gift.description,
            latitude: gift.location.latitude(),
            longitude: gift.location.longitude(),
            address: gift.address.as_deref(),
            prefecture: gift.region.prefecture.as_deref(),
            city: gift.region.city.as_deref(),
            image_url: gift.image_url.as_deref(),
            expiry_date: gift.expiry_date,
            usage_limit: i32::try_from(gift.usage_limit)
                .map_err(|_| format!("usage_limit overflow: {}", gift.usage_limit))?,
            age_restriction: gift.age_restriction.map(|age| i16::from(age.get())),
            school_type_restriction: gift.school_type_restriction.as_str(),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gift_usages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GiftUsageRow {
    pub id: i64,
    pub user_id: Uuid,
    pub gift_id: i64,
    pub qr_code: String,
    pub used_at: DateTime<Utc>,
}

impl TryFrom<GiftUsageRow> for GiftUsage {
    type Error = String;

    fn try_from(row: GiftUsageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            gift_id: GiftId::new(row.gift_id),
            qr_code: redemption_code(row.qr_code)?,
            used_at: row.used_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gift_usages)]
pub(crate) struct NewGiftUsageRow<'a> {
    pub user_id: Uuid,
    pub gift_id: i64,
    pub qr_code: &'a str,
    pub used_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Example data runs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = example_data_runs)]
pub(crate) struct NewExampleDataRunRow<'a> {
    pub seed_key: &'a str,
    pub resident_count: i32,
    pub seed: i64,
}
