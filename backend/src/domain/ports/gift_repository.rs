//! Driven port for gift persistence.
//!
//! Redemption must lock the gift row, recount the user's usages, and insert
//! the usage only while the count stays below the limit.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Gift, GiftFilter, GiftId, GiftRedemption, GiftUsage, GiftUsageWithGift, NewGift,
    RedemptionCode, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by gift repository adapters.
    pub enum GiftRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "gift repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "gift repository query failed: {message}",
        /// The gift does not exist.
        GiftNotFound => "gift not found",
        /// The user has used up their allowance.
        UsageLimitReached { limit: u32, used: u32 } => "usage limit of {limit} reached",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftRepository: Send + Sync {
    /// Active gifts, newest first, fetching up to
    /// [`PageRequest::overfetch_limit`] rows.
    async fn list_active(
        &self,
        filter: &GiftFilter,
        page: PageRequest,
    ) -> Result<Vec<Gift>, GiftRepositoryError>;

    /// Every active gift, for distance ranking.
    async fn all_active(&self) -> Result<Vec<Gift>, GiftRepositoryError>;

    async fn find_by_id(&self, id: GiftId) -> Result<Option<Gift>, GiftRepositoryError>;

    async fn insert(&self, gift: &NewGift) -> Result<Gift, GiftRepositoryError>;

    /// Number of times `user_id` has redeemed `gift_id`.
    async fn usage_count(
        &self,
        user_id: &UserId,
        gift_id: GiftId,
    ) -> Result<u32, GiftRepositoryError>;

    /// Record a redemption under the usage limit guard.
    async fn redeem(&self, redemption: &GiftRedemption) -> Result<GiftUsage, GiftRepositoryError>;

    async fn find_usage_by_code(
        &self,
        code: &RedemptionCode,
    ) -> Result<Option<GiftUsageWithGift>, GiftRepositoryError>;
}
