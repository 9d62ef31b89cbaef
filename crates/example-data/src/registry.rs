//! Seed registry types and JSON parsing.
//!
//! The registry holds the regions residents may live in and the named seeds
//! that drive deterministic generation.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;
use crate::validation::region_violation;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A seed registry containing regions and named seeds.
///
/// # Example
///
/// ```
/// use example_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "regions": [{"prefecture": "大阪府", "city": "大阪市"}],
///     "seeds": [{"name": "test", "seed": 42, "residentCount": 5}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// assert_eq!(registry.regions()[0].city(), "大阪市");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    regions: Vec<RegionDefinition>,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the JSON is malformed, the version is
    /// unsupported, a region is invalid, or either list is empty.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.regions.is_empty() {
            return Err(RegistryError::EmptyRegions);
        }

        let regions = raw
            .regions
            .into_iter()
            .enumerate()
            .map(|(index, region)| match region_violation(&region.prefecture, &region.city) {
                Some(reason) => Err(RegistryError::InvalidRegion { index, reason }),
                None => Ok(RegionDefinition {
                    prefecture: region.prefecture,
                    city: region.city,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(|s| SeedDefinition {
                name: s.name,
                seed: s.seed,
                resident_count: s.resident_count,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            regions,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the regions residents are placed in.
    #[must_use]
    pub fn regions(&self) -> &[RegionDefinition] {
        &self.regions
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A prefecture/city pair residents can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDefinition {
    prefecture: String,
    city: String,
}

impl RegionDefinition {
    /// Returns the prefecture name, e.g. `東京都`.
    #[must_use]
    pub fn prefecture(&self) -> &str {
        &self.prefecture
    }

    /// Returns the city or ward name, e.g. `渋谷区`.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// A named seed definition for deterministic resident generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    resident_count: usize,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of residents to generate.
    #[must_use]
    pub const fn resident_count(&self) -> usize {
        self.resident_count
    }

    /// Returns a copy with a different resident count.
    #[must_use]
    pub fn with_resident_count(&self, resident_count: usize) -> Self {
        Self {
            resident_count,
            ..self.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    regions: Vec<RawRegion>,
    seeds: Vec<RawSeedDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    prefecture: String,
    city: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    resident_count: usize,
}
