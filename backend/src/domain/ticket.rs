//! Event tickets.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{Event, EventId, Price, RedemptionCode, UserId};

/// Maximum tickets bought in one purchase.
pub const TICKET_QUANTITY_MAX: u8 = 10;

/// Database identifier of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(i64);

impl TicketId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error for a quantity outside 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("quantity must be between 1 and {TICKET_QUANTITY_MAX}")]
pub struct TicketQuantityError;

/// Number of admissions in one purchase, 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketQuantity(u8);

impl TicketQuantity {
    pub fn new(value: i64) -> Result<Self, TicketQuantityError> {
        u8::try_from(value)
            .ok()
            .filter(|quantity| (1..=TICKET_QUANTITY_MAX).contains(quantity))
            .map(Self)
            .ok_or(TicketQuantityError)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A purchased ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub qr_code: RedemptionCode,
    pub quantity: TicketQuantity,
    pub total_price: Price,
    pub used_at: Option<DateTime<Utc>>,
    pub purchased_at: DateTime<Utc>,
}

impl Ticket {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

/// Insert payload for a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPurchase {
    pub user_id: UserId,
    pub event_id: EventId,
    pub quantity: TicketQuantity,
    pub qr_code: RedemptionCode,
    pub purchased_at: DateTime<Utc>,
}

/// A ticket together with its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketWithEvent {
    pub ticket: Ticket,
    pub event: Event,
}
