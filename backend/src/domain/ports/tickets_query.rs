//! Driving port for reading tickets.

use async_trait::async_trait;

use crate::domain::{Error, RedemptionCode, TicketWithEvent, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketsQuery: Send + Sync {
    /// The caller's tickets with their events, newest purchase first.
    async fn mine(&self, user_id: &UserId) -> Result<Vec<TicketWithEvent>, Error>;

    /// Look up a ticket by token without changing it.
    async fn verify(&self, code: &RedemptionCode) -> Result<TicketWithEvent, Error>;
}

/// Ticket query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketsQuery;

#[async_trait]
impl TicketsQuery for FixtureTicketsQuery {
    async fn mine(&self, _user_id: &UserId) -> Result<Vec<TicketWithEvent>, Error> {
        Ok(Vec::new())
    }

    async fn verify(&self, _code: &RedemptionCode) -> Result<TicketWithEvent, Error> {
        Err(Error::not_found("ticket not found"))
    }
}
