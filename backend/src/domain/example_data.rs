//! Example data seeding orchestration.
//!
//! Converts deterministic resident seeds from the example-data registry into
//! domain accounts and profiles, then delegates persistence to the seeding
//! repository port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use example_data::{
    ExampleResidentSeed, GenderSeed, GenerationError, RegistryError, SchoolTypeSeed,
    SeedRegistry, generate_example_residents,
};
use thiserror::Error;

use crate::domain::ports::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    ExampleResident, SeedingResult,
};
use crate::domain::{
    Age, ExternalId, Gender, ProfileDraft, ProfileValidationError, SchoolType, User, UserId,
    UserRole, UserValidationError,
};

/// Result of attempting to apply example data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDataSeedOutcome {
    /// Seed key used to record the run.
    pub seed_key: String,
    /// Number of residents generated.
    pub resident_count: usize,
    pub result: SeedingResult,
}

/// Errors raised while preparing or applying example data.
#[derive(Debug, Error)]
pub enum ExampleDataSeedingError {
    #[error("seed registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("example data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Generated account failed backend validation.
    #[error("generated account failed validation: {0}")]
    AccountInvalid(#[from] UserValidationError),
    /// Generated profile failed backend validation.
    #[error("generated profile failed validation: {0}")]
    ProfileInvalid(#[from] ProfileValidationError),
    #[error("seed value {seed} exceeds maximum representable value")]
    SeedOverflow { seed: u64 },
    #[error("resident count {count} exceeds maximum representable value")]
    ResidentCountOverflow { count: usize },
    #[error("example data persistence error: {0}")]
    Persistence(#[from] ExampleDataSeedRepositoryError),
}

/// Service that orchestrates example data seeding.
#[derive(Clone)]
pub struct ExampleDataSeeder<R> {
    repository: Arc<R>,
}

impl<R> ExampleDataSeeder<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> ExampleDataSeeder<R>
where
    R: ExampleDataSeedRepository,
{
    /// Apply example residents for a named seed within the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ExampleDataSeedingError`] if registry lookup, generation,
    /// validation, or persistence fails.
    pub async fn seed_from_registry(
        &self,
        registry: &SeedRegistry,
        seed_name: &str,
        resident_count_override: Option<usize>,
    ) -> Result<ExampleDataSeedOutcome, ExampleDataSeedingError> {
        let seed_def = registry.find_seed(seed_name)?;
        let seed_def = match resident_count_override {
            Some(count) => seed_def.with_resident_count(count),
            None => seed_def.clone(),
        };
        let seed_key = seed_def.name().to_owned();
        let resident_count = seed_def.resident_count();
        let resident_count_i32 = i32::try_from(resident_count).map_err(|_| {
            ExampleDataSeedingError::ResidentCountOverflow {
                count: resident_count,
            }
        })?;
        let seed = i64::try_from(seed_def.seed()).map_err(|_| {
            ExampleDataSeedingError::SeedOverflow {
                seed: seed_def.seed(),
            }
        })?;

        let now = Utc::now();
        let residents = generate_example_residents(registry, &seed_def)?
            .into_iter()
            .map(|seed| convert_resident(seed, now))
            .collect::<Result<Vec<_>, _>>()?;

        let request = ExampleDataSeedRequest {
            seed_key: seed_key.clone(),
            resident_count: resident_count_i32,
            seed,
            residents,
        };
        let result = self.repository.seed_example_data(request).await?;

        Ok(ExampleDataSeedOutcome {
            seed_key,
            resident_count,
            result,
        })
    }
}

fn convert_resident(
    seed: ExampleResidentSeed,
    now: DateTime<Utc>,
) -> Result<ExampleResident, ExampleDataSeedingError> {
    let user_id = UserId::from_uuid(seed.id);
    let user = User {
        id: user_id,
        external_id: ExternalId::new(&seed.external_id)?,
        name: Some(seed.name),
        email: Some(seed.email),
        login_method: Some("example".to_owned()),
        role: UserRole::User,
        last_signed_in: now,
    };
    let profile = ProfileDraft {
        age: Some(Age::new(i64::from(seed.age))?),
        gender: Some(map_gender(seed.gender)),
        address: Some(seed.address),
        prefecture: Some(seed.prefecture),
        city: Some(seed.city),
        occupation: None,
        school_type: Some(map_school_type(seed.school_type)),
    }
    .into_profile(user_id, now);

    Ok(ExampleResident { user, profile })
}

fn map_gender(gender: GenderSeed) -> Gender {
    match gender {
        GenderSeed::Male => Gender::Male,
        GenderSeed::Female => Gender::Female,
        GenderSeed::Other => Gender::Other,
        GenderSeed::PreferNotToSay => Gender::PreferNotToSay,
    }
}

fn map_school_type(school_type: SchoolTypeSeed) -> SchoolType {
    match school_type {
        SchoolTypeSeed::HighSchool => SchoolType::HighSchool,
        SchoolTypeSeed::University => SchoolType::University,
        SchoolTypeSeed::Working => SchoolType::Working,
        SchoolTypeSeed::Other => SchoolType::Other,
    }
}
