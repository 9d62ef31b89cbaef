//! Driving port for buying and using tickets.

use async_trait::async_trait;

use crate::domain::{
    Error, EventId, RedemptionCode, Ticket, TicketQuantity, TicketWithEvent, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketsCommand: Send + Sync {
    /// Buy `quantity` tickets for `event_id`.
    async fn purchase(
        &self,
        user_id: &UserId,
        event_id: EventId,
        quantity: TicketQuantity,
    ) -> Result<Ticket, Error>;

    /// Mark a ticket used; a second use is a conflict.
    async fn use_ticket(&self, code: &RedemptionCode) -> Result<TicketWithEvent, Error>;
}

/// Ticket command used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketsCommand;

#[async_trait]
impl TicketsCommand for FixtureTicketsCommand {
    async fn purchase(
        &self,
        _user_id: &UserId,
        _event_id: EventId,
        _quantity: TicketQuantity,
    ) -> Result<Ticket, Error> {
        Err(Error::service_unavailable("ticket store is not configured"))
    }

    async fn use_ticket(&self, _code: &RedemptionCode) -> Result<TicketWithEvent, Error> {
        Err(Error::service_unavailable("ticket store is not configured"))
    }
}
