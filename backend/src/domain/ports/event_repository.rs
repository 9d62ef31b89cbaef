//! Driven port for event persistence.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Event, EventFilter, EventId, NewEvent};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Soonest event first, fetching up to [`PageRequest::overfetch_limit`]
    /// rows.
    async fn list(
        &self,
        filter: &EventFilter,
        page: PageRequest,
    ) -> Result<Vec<Event>, EventRepositoryError>;

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError>;
}
