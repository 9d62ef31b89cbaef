//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, UserRole: accounts and the role that drives [`rbac`].
//! - UserProfile: demographic profile used for gift restrictions.
//! - Article, Event, Ticket, Gift: community content and redemptions.
//! - RedemptionCode: opaque QR token for tickets and gift usages.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

mod access;
pub mod article;
pub mod content;
pub mod event;
pub mod geo;
pub mod gift;
pub mod prefecture;
pub mod profile;
pub mod rbac;
pub mod redemption;
pub mod ticket;

mod account_service;
mod article_service;
mod event_service;
#[cfg(feature = "example-data")]
pub mod example_data;
mod gift_service;
mod profile_service;
mod ticket_service;

pub use self::account_service::AccountService;
pub use self::article::{
    Article, ArticleCategory, ArticleDraft, ArticleFilter, ArticleId, NewArticle,
};
pub use self::article_service::ArticleService;
pub use self::content::{ContentValidationError, Region, RegionFilter};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::event::{Event, EventDraft, EventFilter, EventId, NewEvent, Price};
pub use self::event_service::EventService;
#[cfg(feature = "example-data")]
pub use self::example_data::{ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError};
pub use self::geo::{GeoPoint, GeoValidationError, Ranked, haversine_km, rank_nearby};
pub use self::gift::{
    Gift, GiftDraft, GiftFilter, GiftId, GiftRedemption, GiftUsage, GiftUsageSummary,
    GiftUsageWithGift, NewGift, SchoolTypeRestriction, check_eligibility,
};
pub use self::gift_service::{GiftService, NEARBY_DEFAULT_LIMIT};
pub use self::prefecture::{
    PREFECTURES, Prefecture, city_coordinates, extract_prefecture_from_address, find_prefecture,
    prefecture_coordinates,
};
pub use self::profile::{
    Age, Gender, ProfileDraft, ProfilePatch, ProfileValidationError, SchoolType, UserProfile,
};
pub use self::profile_service::ProfileService;
pub use self::rbac::{
    Permission, UnknownPermission, check_role, check_roles, has_permission, permissions_for,
    require_permission, role_display_name,
};
pub use self::redemption::{
    RedemptionCode, RedemptionCodeError, RedemptionError, RedemptionKind,
};
pub use self::ticket::{
    Ticket, TicketId, TicketPurchase, TicketQuantity, TicketQuantityError, TicketWithEvent,
};
pub use self::ticket_service::TicketService;
pub use self::trace_id::TraceId;
pub use self::user::{
    ExternalId, ExternalIdentity, User, UserId, UserRole, UserUpsert, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use localconnect::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
