//! JSON bodies and query shapes shared by the HTTP handlers.
//!
//! Domain types stay free of serde and utoipa; these structs carry the
//! camelCase wire shape and the OpenAPI schema.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Article, Event, Gift, GiftUsage, GiftUsageSummary, GiftUsageWithGift, Prefecture, Ranked,
    RegionFilter, Ticket, TicketWithEvent, User, UserId, UserProfile, permissions_for,
    role_display_name,
};

fn user_id_text(id: Option<UserId>) -> Option<String> {
    id.map(|id| id.to_string())
}

/// Query parameters shared by region-filtered listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RegionPageQuery {
    #[param(example = "東京都")]
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<i64>,
}

impl RegionPageQuery {
    pub fn region(&self) -> RegionFilter {
        RegionFilter {
            prefecture: self.prefecture.clone(),
            city: self.city.clone(),
        }
    }
}

/// Body carrying a scanned QR token.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionCodeRequest {
    #[schema(example = "TICKET-7-3fa85f64-5717-4562-b3fc-2c963f66afa6-1767225600000-9f86d081884c7d65")]
    pub qr_code: Option<String>,
}

/// One page of results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub offset: u64,
    /// Offset of the following page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<u64>,
}

impl<T> PageResponse<T> {
    pub fn from_page<S>(page: Page<S>) -> Self
    where
        T: From<S>,
    {
        let page = page.map(T::from);
        Self {
            items: page.items,
            limit: page.limit,
            offset: page.offset,
            next_offset: page.next_offset,
        }
    }
}

/// The signed-in account with its role's capabilities.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "ユーザー")]
    pub role_display_name: String,
    pub permissions: Vec<String>,
    pub last_signed_in: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let role = Some(user.role);
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            login_method: user.login_method,
            role: user.role.as_str().to_owned(),
            role_display_name: role_display_name(role).to_owned(),
            permissions: permissions_for(role)
                .iter()
                .map(|p| p.as_str().to_owned())
                .collect(),
            last_signed_in: user.last_signed_in,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub age: Option<u8>,
    #[schema(example = "prefer_not_to_say")]
    pub gender: Option<String>,
    pub address: Option<String>,
    #[schema(example = "東京都")]
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    #[schema(example = "university")]
    pub school_type: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            age: profile.age.map(|age| age.get()),
            gender: profile.gender.map(|g| g.as_str().to_owned()),
            address: profile.address,
            prefecture: profile.prefecture,
            city: profile.city,
            occupation: profile.occupation,
            school_type: profile.school_type.map(|s| s.as_str().to_owned()),
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[schema(example = "store")]
    pub category: String,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<String>,
    pub view_count: i64,
    pub published_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.get(),
            title: article.title,
            content: article.content,
            category: article.category.as_str().to_owned(),
            prefecture: article.region.prefecture,
            city: article.region.city,
            image_url: article.image_url,
            author_id: user_id_text(article.author_id),
            view_count: article.view_count,
            published_at: article.published_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    /// Decimal yen amount.
    #[schema(example = "1500.00")]
    pub price: String,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<u32>,
    /// Remaining tickets; absent means unlimited.
    pub available_tickets: Option<u32>,
    pub organizer_id: Option<String>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.get(),
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            venue: event.venue,
            price: event.price.to_string(),
            prefecture: event.region.prefecture,
            city: event.region.city,
            image_url: event.image_url,
            capacity: event.capacity,
            available_tickets: event.available_tickets,
            organizer_id: user_id_text(event.organizer_id),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i64,
    pub user_id: String,
    pub event_id: i64,
    #[schema(example = "TICKET-7-3fa85f64-5717-4562-b3fc-2c963f66afa6-1767225600000-9f86d081884c7d65")]
    pub qr_code: String,
    pub quantity: u8,
    #[schema(example = "3000.00")]
    pub total_price: String,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub purchased_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            is_used: ticket.is_used(),
            id: ticket.id.get(),
            user_id: ticket.user_id.to_string(),
            event_id: ticket.event_id.get(),
            qr_code: ticket.qr_code.into_inner(),
            quantity: ticket.quantity.get(),
            total_price: ticket.total_price.to_string(),
            used_at: ticket.used_at,
            purchased_at: ticket.purchased_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketWithEventResponse {
    pub ticket: TicketResponse,
    pub event: EventResponse,
}

impl From<TicketWithEvent> for TicketWithEventResponse {
    fn from(value: TicketWithEvent) -> Self {
        Self {
            ticket: value.ticket.into(),
            event: value.event.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftResponse {
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
    pub usage_limit: u32,
    pub age_restriction: Option<u8>,
    #[schema(example = "none")]
    pub school_type_restriction: String,
    pub is_active: bool,
}

impl From<Gift> for GiftResponse {
    fn from(gift: Gift) -> Self {
        Self {
            id: gift.id.get(),
            store_name: gift.store_name,
            gift_title: gift.gift_title,
            description: gift.description,
            latitude: gift.location.latitude(),
            longitude: gift.location.longitude(),
            address: gift.address,
            prefecture: gift.region.prefecture,
            city: gift.region.city,
            image_url: gift.image_url,
            expiry_date: gift.expiry_date,
            usage_limit: gift.usage_limit,
            age_restriction: gift.age_restriction.map(|age| age.get()),
            school_type_restriction: gift.school_type_restriction.as_str().to_owned(),
            is_active: gift.is_active,
        }
    }
}

/// A gift with its distance from the search origin.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyGiftResponse {
    #[serde(flatten)]
    pub gift: GiftResponse,
    #[schema(example = 1.25)]
    pub distance_km: f64,
}

impl From<Ranked<Gift>> for NearbyGiftResponse {
    fn from(ranked: Ranked<Gift>) -> Self {
        Self {
            gift: ranked.item.into(),
            distance_km: ranked.distance_km,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftUsageResponse {
    pub id: i64,
    pub user_id: String,
    pub gift_id: i64,
    #[schema(example = "GIFT-3-3fa85f64-5717-4562-b3fc-2c963f66afa6-1767225600000-0a1b2c3d4e5f6071")]
    pub qr_code: String,
    pub used_at: DateTime<Utc>,
}

impl From<GiftUsage> for GiftUsageResponse {
    fn from(usage: GiftUsage) -> Self {
        Self {
            id: usage.id,
            user_id: usage.user_id.to_string(),
            gift_id: usage.gift_id.get(),
            qr_code: usage.qr_code.into_inner(),
            used_at: usage.used_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftUsageWithGiftResponse {
    pub usage: GiftUsageResponse,
    pub gift: GiftResponse,
}

impl From<GiftUsageWithGift> for GiftUsageWithGiftResponse {
    fn from(value: GiftUsageWithGift) -> Self {
        Self {
            usage: value.usage.into(),
            gift: value.gift.into(),
        }
    }
}

/// A user's allowance for one gift.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftUsageSummaryResponse {
    pub usage_count: u32,
    pub usage_limit: u32,
    pub can_use: bool,
}

impl From<GiftUsageSummary> for GiftUsageSummaryResponse {
    fn from(summary: GiftUsageSummary) -> Self {
        Self {
            usage_count: summary.usage_count,
            usage_limit: summary.usage_limit,
            can_use: summary.can_use,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrefectureResponse {
    #[schema(example = "13")]
    pub code: String,
    #[schema(example = "東京都")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Prefecture> for PrefectureResponse {
    fn from(prefecture: &Prefecture) -> Self {
        Self {
            code: prefecture.code.to_owned(),
            name: prefecture.name.to_owned(),
            latitude: prefecture.latitude,
            longitude: prefecture.longitude,
        }
    }
}
