//! Driving port for creating and redeeming gifts.

use async_trait::async_trait;

use crate::domain::{Error, Gift, GiftDraft, GiftId, GiftUsage, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftsCommand: Send + Sync {
    /// Create a gift; requires the `create_gifts` permission.
    async fn create(&self, actor: &UserId, draft: GiftDraft) -> Result<Gift, Error>;

    /// Redeem `gift_id` for the caller, issuing a single-use token.
    async fn redeem(&self, user_id: &UserId, gift_id: GiftId) -> Result<GiftUsage, Error>;
}

/// Gift command used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGiftsCommand;

#[async_trait]
impl GiftsCommand for FixtureGiftsCommand {
    async fn create(&self, _actor: &UserId, _draft: GiftDraft) -> Result<Gift, Error> {
        Err(Error::service_unavailable("gift store is not configured"))
    }

    async fn redeem(&self, _user_id: &UserId, _gift_id: GiftId) -> Result<GiftUsage, Error> {
        Err(Error::service_unavailable("gift store is not configured"))
    }
}
