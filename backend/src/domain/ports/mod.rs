//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`, [`LoginService`]) are called by
//! inbound adapters. Driven ports (`*Repository`) are implemented by outbound
//! adapters. Each driving port ships a `Fixture*` implementation used when
//! the server runs without a database.

mod macros;
pub(crate) use macros::define_port_error;

mod article_repository;
mod articles_command;
mod articles_query;
mod event_repository;
mod events_command;
mod events_query;
mod example_data_seed_repository;
mod gift_repository;
mod gifts_command;
mod gifts_query;
mod login_service;
mod ticket_repository;
mod tickets_command;
mod tickets_query;
mod user_profile_command;
mod user_profile_query;
mod user_profile_repository;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use articles_command::MockArticlesCommand;
pub use articles_command::{ArticlesCommand, FixtureArticlesCommand};
#[cfg(test)]
pub use articles_query::MockArticlesQuery;
pub use articles_query::{ArticlesQuery, FixtureArticlesQuery};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use events_command::MockEventsCommand;
pub use events_command::{EventsCommand, FixtureEventsCommand};
#[cfg(test)]
pub use events_query::MockEventsQuery;
pub use events_query::{EventsQuery, FixtureEventsQuery};
#[cfg(test)]
pub use example_data_seed_repository::MockExampleDataSeedRepository;
pub use example_data_seed_repository::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    ExampleResident, SeedingResult,
};
#[cfg(test)]
pub use gift_repository::MockGiftRepository;
pub use gift_repository::{GiftRepository, GiftRepositoryError};
#[cfg(test)]
pub use gifts_command::MockGiftsCommand;
pub use gifts_command::{FixtureGiftsCommand, GiftsCommand};
#[cfg(test)]
pub use gifts_query::MockGiftsQuery;
pub use gifts_query::{FixtureGiftsQuery, GiftsQuery};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use tickets_command::MockTicketsCommand;
pub use tickets_command::{FixtureTicketsCommand, TicketsCommand};
#[cfg(test)]
pub use tickets_query::MockTicketsQuery;
pub use tickets_query::{FixtureTicketsQuery, TicketsQuery};
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_profile_command::{FixtureUserProfileCommand, UserProfileCommand};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::{FixtureUserProfileQuery, UserProfileQuery};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{UserProfileRepository, UserProfileRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{FixtureUsersQuery, UsersQuery};
