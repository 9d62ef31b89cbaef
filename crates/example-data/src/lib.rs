//! Deterministic example resident data for LocalConnect demonstrations.
//!
//! This crate generates believable, reproducible residents (user accounts
//! with profiles) from a JSON seed registry. It is independent of backend
//! domain types so the backend can depend on it behind a feature flag.
//!
//! # Overview
//!
//! - Loading seed registries (regions plus named seeds) from JSON
//! - Deterministic resident generation using named seeds
//! - Name and region validation matching backend constraints
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_residents};
//!
//! let json = r#"{
//!     "version": 1,
//!     "regions": [{"prefecture": "東京都", "city": "渋谷区"}],
//!     "seeds": [{"name": "test-seed", "seed": 42, "residentCount": 3}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("test-seed").expect("seed exists");
//! let residents = generate_example_residents(&registry, seed_def).expect("generation succeeds");
//!
//! assert_eq!(residents.len(), 3);
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::generate_example_residents;
pub use registry::{RegionDefinition, SeedDefinition, SeedRegistry};
pub use seed::{ExampleResidentSeed, GenderSeed, SchoolTypeSeed};
pub use validation::{CITY_MAX, NAME_MAX, PREFECTURE_MAX, is_valid_resident_name};
