//! Merchant gifts and their redemption rules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::content::{
    ContentValidationError, Region, RegionFilter, TITLE_MAX, optional_url, required_text,
};
use crate::domain::{
    Age, GeoPoint, RedemptionCode, RedemptionError, SchoolType, UserId, UserProfile,
    extract_prefecture_from_address,
};

/// Database identifier of a gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GiftId(i64);

impl GiftId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which school type may redeem a gift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchoolTypeRestriction {
    #[default]
    None,
    HighSchool,
    University,
    Working,
}

impl SchoolTypeRestriction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::HighSchool => "high_school",
            Self::University => "university",
            Self::Working => "working",
        }
    }

    /// The single school type admitted, if restricted.
    pub const fn required(self) -> Option<SchoolType> {
        match self {
            Self::None => None,
            Self::HighSchool => Some(SchoolType::HighSchool),
            Self::University => Some(SchoolType::University),
            Self::Working => Some(SchoolType::Working),
        }
    }
}

impl FromStr for SchoolTypeRestriction {
    type Err = ContentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "high_school" => Ok(Self::HighSchool),
            "university" => Ok(Self::University),
            "working" => Ok(Self::Working),
            other => Err(ContentValidationError::UnknownValue {
                field: "schoolTypeRestriction",
                value: other.to_owned(),
            }),
        }
    }
}

/// A merchant offer.
#[derive(Debug, Clone, PartialEq)]
pub struct Gift {
    pub id: GiftId,
    pub store_name: String,
    pub gift_title: String,
    pub description: String,
    pub location: GeoPoint,
    pub address: Option<String>,
    pub region: Region,
    pub image_url: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub usage_limit: u32,
    pub age_restriction: Option<Age>,
    pub school_type_restriction: SchoolTypeRestriction,
    pub is_active: bool,
}

/// Check whether a user may redeem `gift` now.
///
/// Rules apply in order: active, not expired, age, school type, then the
/// per-user usage limit. A restriction that needs a profile field the user
/// has not filled in is treated as unmet.
pub fn check_eligibility(
    gift: &Gift,
    profile: Option<&UserProfile>,
    usage_count: u32,
    now: DateTime<Utc>,
) -> Result<(), RedemptionError> {
    if !gift.is_active {
        return Err(RedemptionError::Inactive);
    }
    if let Some(expired_at) = gift.expiry_date.filter(|expiry| *expiry < now) {
        return Err(RedemptionError::Expired { expired_at });
    }
    if let Some(required) = gift.age_restriction {
        let actual = profile.and_then(|p| p.age);
        if actual.is_none_or(|age| age < required) {
            return Err(RedemptionError::AgeRestriction {
                required: required.get(),
                actual: actual.map(Age::get),
            });
        }
    }
    if let Some(required) = gift.school_type_restriction.required() {
        let actual = profile.and_then(|p| p.school_type);
        if actual != Some(required) {
            return Err(RedemptionError::SchoolTypeRestriction {
                required: required.as_str(),
                actual: actual.map(SchoolType::as_str),
            });
        }
    }
    if usage_count >= gift.usage_limit {
        return Err(RedemptionError::UsageLimitReached {
            limit: gift.usage_limit,
            used: usage_count,
        });
    }
    Ok(())
}

/// Validated input for creating a gift.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGift {
    pub store_name: String,
    pub gift_title: String,
    pub description: String,
    pub location: GeoPoint,
    pub address: Option<String>,
    pub region: Region,
    pub image_url: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub usage_limit: u32,
    pub age_restriction: Option<Age>,
    pub school_type_restriction: SchoolTypeRestriction,
}

/// Unvalidated gift fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct GiftDraft {
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
    pub usage_limit: Option<i64>,
    pub age_restriction: Option<i64>,
    pub school_type_restriction: Option<String>,
}

impl TryFrom<GiftDraft> for NewGift {
    type Error = ContentValidationError;

    fn try_from(draft: GiftDraft) -> Result<Self, Self::Error> {
        let location = GeoPoint::new(draft.latitude, draft.longitude).map_err(|err| {
            let field = match err {
                crate::domain::GeoValidationError::LatitudeOutOfRange(_) => "latitude",
                crate::domain::GeoValidationError::LongitudeOutOfRange(_) => "longitude",
            };
            ContentValidationError::OutOfRange { field }
        })?;
        let usage_limit = match draft.usage_limit {
            None => 1,
            Some(limit) => u32::try_from(limit)
                .ok()
                .filter(|limit| *limit >= 1)
                .ok_or(ContentValidationError::OutOfRange {
                    field: "usageLimit",
                })?,
        };
        let age_restriction = draft
            .age_restriction
            .map(|age| {
                Age::new(age).map_err(|_| ContentValidationError::OutOfRange {
                    field: "ageRestriction",
                })
            })
            .transpose()?;
        let school_type_restriction = draft
            .school_type_restriction
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        let prefecture = draft.prefecture.or_else(|| {
            draft
                .address
                .as_deref()
                .and_then(extract_prefecture_from_address)
                .map(|p| p.name.to_owned())
        });

        Ok(Self {
            store_name: required_text("storeName", &draft.store_name, Some(TITLE_MAX))?,
            gift_title: required_text("giftTitle", &draft.gift_title, Some(TITLE_MAX))?,
            description: required_text("description", &draft.description, None)?,
            location,
            address: draft.address,
            region: Region::new(prefecture, draft.city)?,
            image_url: optional_url("imageUrl", draft.image_url)?,
            expiry_date: draft.expiry_date,
            usage_limit,
            age_restriction,
            school_type_restriction,
        })
    }
}

/// Filters for listing gifts.
pub type GiftFilter = RegionFilter;

/// One redemption of a gift by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftUsage {
    pub id: i64,
    pub user_id: UserId,
    pub gift_id: GiftId,
    pub qr_code: RedemptionCode,
    pub used_at: DateTime<Utc>,
}

/// Insert payload for a redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftRedemption {
    pub user_id: UserId,
    pub gift_id: GiftId,
    pub qr_code: RedemptionCode,
    pub used_at: DateTime<Utc>,
}

/// A usage together with its gift.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftUsageWithGift {
    pub usage: GiftUsage,
    pub gift: Gift,
}

/// Per-user allowance for one gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiftUsageSummary {
    pub usage_count: u32,
    pub usage_limit: u32,
    pub can_use: bool,
}

impl GiftUsageSummary {
    pub fn new(usage_count: u32, usage_limit: u32) -> Self {
        Self {
            usage_count,
            usage_limit,
            can_use: usage_count < usage_limit,
        }
    }
}
