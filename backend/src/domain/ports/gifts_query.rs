//! Driving port for browsing gifts and checking allowances.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Error, GeoPoint, Gift, GiftFilter, GiftId, GiftUsageSummary, GiftUsageWithGift, Ranked,
    RedemptionCode, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftsQuery: Send + Sync {
    /// Active gifts matching `filter`.
    async fn list(&self, filter: GiftFilter, page: PageRequest) -> Result<Page<Gift>, Error>;

    /// Active gifts nearest to `origin`, at most `limit`.
    async fn nearby(&self, origin: GeoPoint, limit: usize) -> Result<Vec<Ranked<Gift>>, Error>;

    async fn get(&self, id: GiftId) -> Result<Gift, Error>;

    /// How often the caller has used `gift_id` and whether they may again.
    async fn usage(&self, user_id: &UserId, gift_id: GiftId) -> Result<GiftUsageSummary, Error>;

    /// Look up a redemption by token without changing it.
    async fn verify(&self, code: &RedemptionCode) -> Result<GiftUsageWithGift, Error>;
}

/// Gift query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGiftsQuery;

#[async_trait]
impl GiftsQuery for FixtureGiftsQuery {
    async fn list(&self, _filter: GiftFilter, page: PageRequest) -> Result<Page<Gift>, Error> {
        Ok(Page::from_overfetch(Vec::new(), page))
    }

    async fn nearby(&self, _origin: GeoPoint, _limit: usize) -> Result<Vec<Ranked<Gift>>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, id: GiftId) -> Result<Gift, Error> {
        Err(Error::not_found(format!("gift {id} not found")))
    }

    async fn usage(&self, _user_id: &UserId, gift_id: GiftId) -> Result<GiftUsageSummary, Error> {
        Err(Error::not_found(format!("gift {gift_id} not found")))
    }

    async fn verify(&self, _code: &RedemptionCode) -> Result<GiftUsageWithGift, Error> {
        Err(Error::not_found("gift usage not found"))
    }
}
