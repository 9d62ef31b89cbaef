//! PostgreSQL-backed `EventRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventFilter, EventId, NewEvent};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{collect_rows, page_bounds};
use super::models::{EventRow, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the `EventRepository` port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, |message| EventRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        |message| EventRepositoryError::query(message),
        |message| EventRepositoryError::connection(message),
    )
}

fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    Event::try_from(row).map_err(|message| EventRepositoryError::query(message))
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn list(
        &self,
        filter: &EventFilter,
        page: PageRequest,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        let (limit, offset) =
            page_bounds(page).map_err(|message| EventRepositoryError::query(message))?;
        let mut query = events::table.into_boxed();
        if let Some(prefecture) = filter.prefecture.as_deref() {
            query = query.filter(events::prefecture.eq(prefecture));
        }
        if let Some(city) = filter.city.as_deref() {
            query = query.filter(events::city.eq(city));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = query
            .select(EventRow::as_select())
            .order_by((events::event_date.asc(), events::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows, |message| EventRepositoryError::query(message))
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        events::table
            .filter(events::id.eq(id.get()))
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_event)
            .transpose()
    }

    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError> {
        let row = NewEventRow::try_from(event)
            .map_err(|message| EventRepositoryError::query(message))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: EventRow = diesel::insert_into(events::table)
            .values(row)
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_event(stored)
    }
}
