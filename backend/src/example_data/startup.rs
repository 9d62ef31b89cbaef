//! Seed demo residents when the server starts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use example_data::{RegistryError, SeedRegistry};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::SeedingResult;
use crate::domain::{ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError};
use crate::example_data::config::ExampleDataSettings;
use crate::outbound::persistence::{DbPool, DieselExampleDataSeedRepository};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("registry parse error: {0}")]
    Registry(#[from] RegistryError),
    #[error("example data seeding error: {0}")]
    Seeding(#[from] ExampleDataSeedingError),
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Apply demo residents on startup when enabled.
///
/// Seeding is skipped (with a warning) when no database is configured and
/// is a no-op when the named seed was applied before.
///
/// # Examples
///
/// ```rust,no_run
/// use localconnect::example_data::{ExampleDataSettings, seed_example_data_on_startup};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ExampleDataSettings::default();
/// assert!(seed_example_data_on_startup(&settings, None).await?.is_none());
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_data_on_startup(
    settings: &ExampleDataSettings,
    db_pool: Option<&DbPool>,
) -> Result<Option<ExampleDataSeedOutcome>, StartupSeedingError> {
    if !settings.is_enabled() {
        info!(reason = "disabled", "example data seeding skipped");
        return Ok(None);
    }

    let seed_name = settings.seed_name().trim();
    if seed_name.is_empty() {
        return Err(StartupSeedingError::EmptySeedName);
    }

    let Some(db_pool) = db_pool else {
        warn!(
            seed_key = seed_name,
            "example data seeding enabled but no database is configured; skipping"
        );
        return Ok(None);
    };

    let registry = load_registry(&settings.registry_path())?;
    let seeder = ExampleDataSeeder::new(Arc::new(DieselExampleDataSeedRepository::new(
        db_pool.clone(),
    )));
    let outcome = seeder
        .seed_from_registry(&registry, seed_name, settings.resident_override())
        .await?;

    let status = match outcome.result {
        SeedingResult::Applied => "applied",
        SeedingResult::AlreadySeeded => "already applied",
    };
    info!(
        seed_key = %outcome.seed_key,
        resident_count = outcome.resident_count,
        status,
        "example data seeding finished"
    );

    Ok(Some(outcome))
}

fn registry_read_error(path: &Path, source: std::io::Error) -> StartupSeedingError {
    StartupSeedingError::RegistryRead {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the registry through a capability handle on its parent directory.
fn load_registry(path: &Path) -> Result<SeedRegistry, StartupSeedingError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        registry_read_error(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "registry path must be a file"),
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|source| registry_read_error(path, source))?;
    let contents = dir
        .read_to_string(Path::new(file_name))
        .map_err(|source| registry_read_error(path, source))?;
    Ok(SeedRegistry::from_json(&contents)?)
}
