//! Ticket purchase, listing, verification, and single use.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{TicketRepository, TicketRepositoryError, TicketsCommand, TicketsQuery};
use crate::domain::{
    Error, EventId, RedemptionCode, RedemptionError, RedemptionKind, Ticket, TicketPurchase,
    TicketQuantity, TicketWithEvent, UserId,
};

/// Ticket service implementing the ticket driving ports.
#[derive(Clone)]
pub struct TicketService<T> {
    tickets: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> TicketService<T> {
    pub fn new(tickets: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self { tickets, clock }
    }
}

fn map_ticket_error(error: TicketRepositoryError) -> Error {
    let redemption = match error {
        TicketRepositoryError::Query { message } => {
            return Error::internal(format!("ticket repository error: {message}"));
        }
        TicketRepositoryError::Connection { message } => RedemptionError::Transient { message },
        TicketRepositoryError::EventNotFound => RedemptionError::NotFound { entity: "event" },
        TicketRepositoryError::TicketNotFound => RedemptionError::NotFound { entity: "ticket" },
        TicketRepositoryError::InsufficientTickets {
            requested,
            available,
        } => RedemptionError::InsufficientInventory {
            requested,
            available,
        },
        TicketRepositoryError::AlreadyUsed { used_at } => RedemptionError::AlreadyUsed { used_at },
    };
    redemption.into()
}

#[async_trait]
impl<T> TicketsCommand for TicketService<T>
where
    T: TicketRepository,
{
    async fn purchase(
        &self,
        user_id: &UserId,
        event_id: EventId,
        quantity: TicketQuantity,
    ) -> Result<Ticket, Error> {
        let purchased_at = self.clock.utc();
        let purchase = TicketPurchase {
            user_id: *user_id,
            event_id,
            quantity,
            qr_code: RedemptionCode::issue(
                RedemptionKind::Ticket,
                event_id.get(),
                user_id,
                purchased_at,
            ),
            purchased_at,
        };
        let ticket = self.tickets.purchase(&purchase).await.map_err(|err| {
            warn!(%user_id, %event_id, reason = err.kind(), "ticket purchase rejected");
            map_ticket_error(err)
        })?;
        info!(
            ticket_id = %ticket.id,
            %event_id,
            quantity = quantity.get(),
            total_price = %ticket.total_price,
            "tickets purchased"
        );
        Ok(ticket)
    }

    async fn use_ticket(&self, code: &RedemptionCode) -> Result<TicketWithEvent, Error> {
        let used = self
            .tickets
            .mark_used(code, self.clock.utc())
            .await
            .map_err(map_ticket_error)?;
        info!(ticket_id = %used.ticket.id, event_id = %used.event.id, "ticket used");
        Ok(used)
    }
}

#[async_trait]
impl<T> TicketsQuery for TicketService<T>
where
    T: TicketRepository,
{
    async fn mine(&self, user_id: &UserId) -> Result<Vec<TicketWithEvent>, Error> {
        self.tickets
            .list_for_user(user_id)
            .await
            .map_err(map_ticket_error)
    }

    async fn verify(&self, code: &RedemptionCode) -> Result<TicketWithEvent, Error> {
        self.tickets
            .find_by_code(code)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| RedemptionError::NotFound { entity: "ticket" }.into())
    }
}
