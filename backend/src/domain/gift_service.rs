//! Gift browsing, nearby ranking, creation, and redemption.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{MAX_LIMIT, Page, PageRequest};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::access::authorize;
use crate::domain::ports::{
    GiftRepository, GiftRepositoryError, GiftsCommand, GiftsQuery, UserProfileRepository,
    UserRepository,
};
use crate::domain::profile_service::map_profile_error;
use crate::domain::{
    Error, GeoPoint, Gift, GiftDraft, GiftFilter, GiftId, GiftRedemption, GiftUsage,
    GiftUsageSummary, GiftUsageWithGift, NewGift, Permission, Ranked, RedemptionCode,
    RedemptionError, RedemptionKind, UserId, check_eligibility, rank_nearby,
};

/// Default number of gifts returned by the nearby search.
pub const NEARBY_DEFAULT_LIMIT: usize = 20;

/// Gift service implementing the gift driving ports.
#[derive(Clone)]
pub struct GiftService<G, P, U> {
    gifts: Arc<G>,
    profiles: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<G, P, U> GiftService<G, P, U> {
    pub fn new(gifts: Arc<G>, profiles: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gifts,
            profiles,
            users,
            clock,
        }
    }
}

fn map_gift_error(error: GiftRepositoryError) -> Error {
    let redemption = match error {
        GiftRepositoryError::Query { message } => {
            return Error::internal(format!("gift repository error: {message}"));
        }
        GiftRepositoryError::Connection { message } => RedemptionError::Transient { message },
        GiftRepositoryError::GiftNotFound => RedemptionError::NotFound { entity: "gift" },
        GiftRepositoryError::UsageLimitReached { limit, used } => {
            RedemptionError::UsageLimitReached { limit, used }
        }
    };
    redemption.into()
}

impl<G, P, U> GiftService<G, P, U>
where
    G: GiftRepository,
{
    async fn require_gift(&self, id: GiftId) -> Result<Gift, Error> {
        self.gifts
            .find_by_id(id)
            .await
            .map_err(map_gift_error)?
            .ok_or_else(|| RedemptionError::NotFound { entity: "gift" }.into())
    }
}

#[async_trait]
impl<G, P, U> GiftsQuery for GiftService<G, P, U>
where
    G: GiftRepository,
    P: UserProfileRepository,
    U: UserRepository,
{
    async fn list(&self, filter: GiftFilter, page: PageRequest) -> Result<Page<Gift>, Error> {
        let rows = self
            .gifts
            .list_active(&filter, page)
            .await
            .map_err(map_gift_error)?;
        Ok(Page::from_overfetch(rows, page))
    }

    async fn nearby(&self, origin: GeoPoint, limit: usize) -> Result<Vec<Ranked<Gift>>, Error> {
        let max = usize::try_from(MAX_LIMIT).unwrap_or(usize::MAX);
        if !(1..=max).contains(&limit) {
            return Err(Error::invalid_request(format!(
                "limit must be between 1 and {max}"
            ))
            .with_details(json!({ "field": "limit", "code": "out_of_range" })));
        }
        let gifts = self.gifts.all_active().await.map_err(map_gift_error)?;
        Ok(rank_nearby(&origin, gifts, |gift| gift.location, limit))
    }

    async fn get(&self, id: GiftId) -> Result<Gift, Error> {
        self.require_gift(id).await
    }

    async fn usage(&self, user_id: &UserId, gift_id: GiftId) -> Result<GiftUsageSummary, Error> {
        let gift = self.require_gift(gift_id).await?;
        let count = self
            .gifts
            .usage_count(user_id, gift_id)
            .await
            .map_err(map_gift_error)?;
        Ok(GiftUsageSummary::new(count, gift.usage_limit))
    }

    async fn verify(&self, code: &RedemptionCode) -> Result<GiftUsageWithGift, Error> {
        self.gifts
            .find_usage_by_code(code)
            .await
            .map_err(map_gift_error)?
            .ok_or_else(|| {
                RedemptionError::NotFound {
                    entity: "gift usage",
                }
                .into()
            })
    }
}

#[async_trait]
impl<G, P, U> GiftsCommand for GiftService<G, P, U>
where
    G: GiftRepository,
    P: UserProfileRepository,
    U: UserRepository,
{
    async fn create(&self, actor: &UserId, draft: GiftDraft) -> Result<Gift, Error> {
        authorize(self.users.as_ref(), actor, Permission::CreateGifts).await?;
        let gift = NewGift::try_from(draft)?;
        let created = self.gifts.insert(&gift).await.map_err(map_gift_error)?;
        info!(gift_id = %created.id, store = %created.store_name, "gift created");
        Ok(created)
    }

    async fn redeem(&self, user_id: &UserId, gift_id: GiftId) -> Result<GiftUsage, Error> {
        let gift = self.require_gift(gift_id).await?;
        let usage_count = self
            .gifts
            .usage_count(user_id, gift_id)
            .await
            .map_err(map_gift_error)?;
        let profile = self
            .profiles
            .find(user_id)
            .await
            .map_err(map_profile_error)?;

        let now = self.clock.utc();
        if let Err(err) = check_eligibility(&gift, profile.as_ref(), usage_count, now) {
            warn!(%user_id, %gift_id, reason = err.reason(), "gift redemption refused");
            return Err(err.into());
        }

        let redemption = GiftRedemption {
            user_id: *user_id,
            gift_id,
            qr_code: RedemptionCode::issue(RedemptionKind::Gift, gift_id.get(), user_id, now),
            used_at: now,
        };
        let usage = self
            .gifts
            .redeem(&redemption)
            .await
            .map_err(map_gift_error)?;
        info!(usage_id = usage.id, %gift_id, %user_id, "gift redeemed");
        Ok(usage)
    }
}

#[cfg(test)]
#[path = "gift_service_tests.rs"]
mod tests;
