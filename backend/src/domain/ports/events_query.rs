//! Driving port for reading events.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Event, EventFilter, EventId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsQuery: Send + Sync {
    /// Events matching `filter`, soonest first.
    async fn list(&self, filter: EventFilter, page: PageRequest) -> Result<Page<Event>, Error>;

    async fn get(&self, id: EventId) -> Result<Event, Error>;
}

/// Event query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventsQuery;

#[async_trait]
impl EventsQuery for FixtureEventsQuery {
    async fn list(&self, _filter: EventFilter, page: PageRequest) -> Result<Page<Event>, Error> {
        Ok(Page::from_overfetch(Vec::new(), page))
    }

    async fn get(&self, id: EventId) -> Result<Event, Error> {
        Err(Error::not_found(format!("event {id} not found")))
    }
}
