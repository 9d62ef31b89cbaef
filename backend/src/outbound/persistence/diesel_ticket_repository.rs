//! PostgreSQL-backed `TicketRepository` implementation.
//!
//! Inventory is reserved with a conditional `UPDATE ... WHERE
//! available_tickets >= quantity`, so concurrent purchases can never drive the
//! count below zero. Ticket use flips `is_used` with a conditional update in
//! the same way, so a token is accepted at most once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Event, RedemptionCode, Ticket, TicketPurchase, TicketWithEvent, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::TransactionError;
use super::models::{EventRow, NewTicketRow, TicketRow};
use super::pool::{DbPool, PoolError};
use super::schema::{events, tickets};

type TxResult<T> = Result<T, TransactionError<TicketRepositoryError>>;

/// Diesel-backed implementation of the `TicketRepository` port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    map_basic_pool_error(error, |message| TicketRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> TicketRepositoryError {
    map_basic_diesel_error(
        error,
        |message| TicketRepositoryError::query(message),
        |message| TicketRepositoryError::connection(message),
    )
}

fn rejected(error: TicketRepositoryError) -> TransactionError<TicketRepositoryError> {
    TransactionError::Rejected(error)
}

fn query_error(message: String) -> TransactionError<TicketRepositoryError> {
    rejected(TicketRepositoryError::query(message))
}

fn join_rows(
    (ticket, event): (TicketRow, EventRow),
) -> Result<TicketWithEvent, TicketRepositoryError> {
    Ok(TicketWithEvent {
        ticket: Ticket::try_from(ticket).map_err(|m| TicketRepositoryError::query(m))?,
        event: Event::try_from(event).map_err(|m| TicketRepositoryError::query(m))?,
    })
}

/// Reserve `quantity` tickets, returning the event as it stands afterwards.
async fn reserve(conn: &mut AsyncPgConnection, event_id: i64, quantity: i32) -> TxResult<Event> {
    let reserved: Option<EventRow> = diesel::update(
        events::table
            .filter(events::id.eq(event_id))
            .filter(events::available_tickets.ge(quantity)),
    )
    .set(events::available_tickets.eq(events::available_tickets - quantity))
    .returning(EventRow::as_returning())
    .get_result(conn)
    .await
    .optional()?;

    let row = match reserved {
        Some(row) => row,
        None => {
            let current: Option<EventRow> = events::table
                .filter(events::id.eq(event_id))
                .select(EventRow::as_select())
                .for_update()
                .first(conn)
                .await
                .optional()?;
            let row = current.ok_or_else(|| rejected(TicketRepositoryError::event_not_found()))?;
            if let Some(available) = row.available_tickets {
                debug!(event_id, available, quantity, "insufficient tickets");
                return Err(rejected(TicketRepositoryError::insufficient_tickets(
                    u32::try_from(quantity).unwrap_or_default(),
                    u32::try_from(available).unwrap_or_default(),
                )));
            }
            row
        }
    };
    Event::try_from(row).map_err(query_error)
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn purchase(&self, purchase: &TicketPurchase) -> Result<Ticket, TicketRepositoryError> {
        let quantity = i32::from(purchase.quantity.get());
        let event_id = purchase.event_id.get();
        let user_id = *purchase.user_id.as_uuid();
        let qr_code = purchase.qr_code.as_ref();
        let purchased_at = purchase.purchased_at;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TicketRow = conn
            .transaction::<_, TransactionError<TicketRepositoryError>, _>(|conn| {
                async move {
                    let event = reserve(conn, event_id, quantity).await?;
                    let total = event
                        .price
                        .checked_mul(purchase.quantity.get())
                        .ok_or_else(|| query_error("total price overflow".to_owned()))?;

                    let row = diesel::insert_into(tickets::table)
                        .values(NewTicketRow {
                            user_id,
                            event_id,
                            qr_code,
                            quantity,
                            total_price_minor: total.minor_units(),
                            purchased_at,
                        })
                        .returning(TicketRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| err.into_port_error(map_diesel_error))?;

        Ticket::try_from(row).map_err(|message| TicketRepositoryError::query(message))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TicketWithEvent>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(TicketRow, EventRow)> = tickets::table
            .inner_join(events::table)
            .filter(tickets::user_id.eq(user_id.as_uuid()))
            .order_by((tickets::purchased_at.desc(), tickets::id.desc()))
            .select((TicketRow::as_select(), EventRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(join_rows).collect()
    }

    async fn find_by_code(
        &self,
        code: &RedemptionCode,
    ) -> Result<Option<TicketWithEvent>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        tickets::table
            .inner_join(events::table)
            .filter(tickets::qr_code.eq(code.as_ref()))
            .select((TicketRow::as_select(), EventRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(join_rows)
            .transpose()
    }

    async fn mark_used(
        &self,
        code: &RedemptionCode,
        used_at: DateTime<Utc>,
    ) -> Result<TicketWithEvent, TicketRepositoryError> {
        let code = code.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pair = conn
            .transaction::<_, TransactionError<TicketRepositoryError>, _>(|conn| {
                async move {
                    let flipped: Option<TicketRow> = diesel::update(
                        tickets::table
                            .filter(tickets::qr_code.eq(code))
                            .filter(tickets::is_used.eq(false)),
                    )
                    .set((tickets::is_used.eq(true), tickets::used_at.eq(Some(used_at))))
                    .returning(TicketRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(ticket) = flipped else {
                        let existing: Option<TicketRow> = tickets::table
                            .filter(tickets::qr_code.eq(code))
                            .select(TicketRow::as_select())
                            .first(conn)
                            .await
                            .optional()?;
                        return Err(rejected(match existing {
                            Some(row) => TicketRepositoryError::already_used(row.used_at),
                            None => TicketRepositoryError::ticket_not_found(),
                        }));
                    };

                    let event: EventRow = events::table
                        .filter(events::id.eq(ticket.event_id))
                        .select(EventRow::as_select())
                        .first(conn)
                        .await?;
                    Ok((ticket, event))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| err.into_port_error(map_diesel_error))?;

        join_rows(pair)
    }
}
