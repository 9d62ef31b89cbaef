//! Driving port for scheduling events.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventDraft, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsCommand: Send + Sync {
    /// Create an event; requires the `create_events` permission.
    async fn create(&self, actor: &UserId, draft: EventDraft) -> Result<Event, Error>;
}

/// Event command used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventsCommand;

#[async_trait]
impl EventsCommand for FixtureEventsCommand {
    async fn create(&self, _actor: &UserId, _draft: EventDraft) -> Result<Event, Error> {
        Err(Error::service_unavailable("event store is not configured"))
    }
}
