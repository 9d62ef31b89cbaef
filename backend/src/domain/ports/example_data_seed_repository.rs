//! Driven port for applying example resident seeds.
//!
//! Adapters record the seed run and insert the generated accounts and
//! profiles in one transaction. A seed key that was already applied is left
//! untouched.

use async_trait::async_trait;

use crate::domain::{User, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by example data seed repository adapters.
    pub enum ExampleDataSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "example data seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "example data seeding query failed: {message}",
    }
}

/// Outcome of a seed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The run was recorded and residents inserted.
    Applied,
    /// The seed key had already been applied.
    AlreadySeeded,
}

/// A generated account together with its profile.
#[derive(Debug, Clone)]
pub struct ExampleResident {
    pub user: User,
    pub profile: UserProfile,
}

/// Request payload for applying a seed run.
#[derive(Debug, Clone)]
pub struct ExampleDataSeedRequest {
    /// Seed name recorded in the run table.
    pub seed_key: String,
    pub resident_count: i32,
    /// RNG seed used for generation.
    pub seed: i64,
    pub residents: Vec<ExampleResident>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExampleDataSeedRepository: Send + Sync {
    /// Apply a seed run unless its key has already been recorded.
    async fn seed_example_data(
        &self,
        request: ExampleDataSeedRequest,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError>;
}
