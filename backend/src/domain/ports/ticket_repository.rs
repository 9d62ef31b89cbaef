//! Driven port for ticket persistence.
//!
//! Adapters own the inventory guard: a purchase must decrement the event's
//! remaining tickets and insert the ticket atomically, and marking a ticket
//! used must succeed at most once per token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{RedemptionCode, Ticket, TicketPurchase, TicketWithEvent, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
        /// The event does not exist.
        EventNotFound => "event not found",
        /// Fewer tickets remain than requested.
        InsufficientTickets { requested: u32, available: u32 } =>
            "only {available} tickets remain, {requested} requested",
        /// No ticket carries the presented token.
        TicketNotFound => "ticket not found",
        /// The ticket was already used.
        AlreadyUsed { used_at: Option<DateTime<Utc>> } => "ticket already used",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Reserve inventory and record the ticket in one transaction.
    ///
    /// The total price is the event price multiplied by the quantity.
    async fn purchase(&self, purchase: &TicketPurchase) -> Result<Ticket, TicketRepositoryError>;

    /// Tickets held by `user_id`, newest purchase first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TicketWithEvent>, TicketRepositoryError>;

    async fn find_by_code(
        &self,
        code: &RedemptionCode,
    ) -> Result<Option<TicketWithEvent>, TicketRepositoryError>;

    /// Flip the ticket to used, failing if it was already used.
    async fn mark_used(
        &self,
        code: &RedemptionCode,
        used_at: DateTime<Utc>,
    ) -> Result<TicketWithEvent, TicketRepositoryError>;
}
