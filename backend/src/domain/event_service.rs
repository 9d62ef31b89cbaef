//! Event listing and scheduling.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::access::authorize;
use crate::domain::ports::{
    EventRepository, EventRepositoryError, EventsCommand, EventsQuery, UserRepository,
};
use crate::domain::{Error, Event, EventDraft, EventFilter, EventId, NewEvent, Permission, UserId};

/// Event service implementing the event driving ports.
#[derive(Clone)]
pub struct EventService<E, U> {
    events: Arc<E>,
    users: Arc<U>,
}

impl<E, U> EventService<E, U> {
    pub fn new(events: Arc<E>, users: Arc<U>) -> Self {
        Self { events, users }
    }
}

pub(crate) fn map_event_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventRepositoryError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

#[async_trait]
impl<E, U> EventsQuery for EventService<E, U>
where
    E: EventRepository,
    U: UserRepository,
{
    async fn list(&self, filter: EventFilter, page: PageRequest) -> Result<Page<Event>, Error> {
        let rows = self
            .events
            .list(&filter, page)
            .await
            .map_err(map_event_error)?;
        Ok(Page::from_overfetch(rows, page))
    }

    async fn get(&self, id: EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(format!("event {id} not found")))
    }
}

#[async_trait]
impl<E, U> EventsCommand for EventService<E, U>
where
    E: EventRepository,
    U: UserRepository,
{
    async fn create(&self, actor: &UserId, draft: EventDraft) -> Result<Event, Error> {
        authorize(self.users.as_ref(), actor, Permission::CreateEvents).await?;
        let event = NewEvent::from_draft(draft, *actor)?;
        let created = self
            .events
            .insert(&event)
            .await
            .map_err(map_event_error)?;
        info!(event_id = %created.id, organizer = %actor, "event created");
        Ok(created)
    }
}
