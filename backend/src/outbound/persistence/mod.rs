//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations translate between Diesel
//!   models and domain types. Business rules stay in the domain services.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **Atomic guards**: Ticket inventory, ticket use, and gift usage limits
//!   are enforced inside database transactions so concurrent requests cannot
//!   oversell or double-redeem.
//!
//! # Example
//!
//! ```ignore
//! use localconnect::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/localconnect");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_article_repository;
mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_example_data_seed_repository;
mod diesel_gift_repository;
pub(crate) mod diesel_helpers;
mod diesel_ticket_repository;
mod diesel_user_profile_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_example_data_seed_repository::DieselExampleDataSeedRepository;
pub use diesel_gift_repository::DieselGiftRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, PoolStatus};
