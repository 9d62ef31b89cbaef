//! Deterministic resident generation from seed definitions.
//!
//! The same seed value always produces identical output, so demo databases
//! can be rebuilt byte for byte.

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::registry::{RegionDefinition, SeedDefinition, SeedRegistry};
use crate::seed::{ExampleResidentSeed, GenderSeed, SchoolTypeSeed};
use crate::validation::is_valid_resident_name;

/// Maximum number of attempts to generate a valid name.
const MAX_NAME_ATTEMPTS: usize = 100;

const MIN_AGE: u8 = 15;
const MAX_AGE: u8 = 72;

const GENDERS: [GenderSeed; 4] = [
    GenderSeed::Male,
    GenderSeed::Female,
    GenderSeed::Other,
    GenderSeed::PreferNotToSay,
];

/// Generates example residents from a seed definition.
///
/// Each resident gets a deterministic UUID, a name, an email derived from
/// the name, an age with a matching school type, and a region drawn from the
/// registry.
///
/// # Errors
///
/// Returns [`GenerationError`] if the registry has no regions or a valid
/// name cannot be produced.
///
/// # Example
///
/// ```
/// use example_data::{SeedRegistry, generate_example_residents};
///
/// let json = r#"{
///     "version": 1,
///     "regions": [{"prefecture": "福岡県", "city": "福岡市"}],
///     "seeds": [{"name": "test", "seed": 42, "residentCount": 3}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid");
/// let seed_def = registry.find_seed("test").expect("found");
/// let residents = generate_example_residents(&registry, seed_def).expect("generated");
///
/// assert_eq!(residents.len(), 3);
/// let again = generate_example_residents(&registry, seed_def).expect("generated");
/// assert_eq!(residents, again);
/// ```
pub fn generate_example_residents(
    registry: &SeedRegistry,
    seed_def: &SeedDefinition,
) -> Result<Vec<ExampleResidentSeed>, GenerationError> {
    if registry.regions().is_empty() {
        return Err(GenerationError::NoRegions);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    (0..seed_def.resident_count())
        .map(|ordinal| generate_single_resident(&mut rng, registry.regions(), ordinal))
        .collect()
}

fn generate_single_resident(
    rng: &mut ChaCha8Rng,
    regions: &[RegionDefinition],
    ordinal: usize,
) -> Result<ExampleResidentSeed, GenerationError> {
    let id = Uuid::from_u128(rng.random());
    let (first, last) = generate_name(rng)?;
    let age = rng.random_range(MIN_AGE..=MAX_AGE);
    let school_type = school_type_for_age(rng, age);
    let gender = GENDERS.choose(rng).copied().unwrap_or(GenderSeed::Other);
    let region = regions.choose(rng).ok_or(GenerationError::NoRegions)?;
    let block: u16 = rng.random_range(1..=30);
    let lot: u16 = rng.random_range(1..=20);

    Ok(ExampleResidentSeed {
        id,
        external_id: format!("example|{id}"),
        email: format!(
            "{}.{}{ordinal}@example.jp",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        name: format!("{first} {last}"),
        age,
        gender,
        school_type,
        prefecture: region.prefecture().to_owned(),
        city: region.city().to_owned(),
        address: format!("{}{}{block}-{lot}", region.prefecture(), region.city()),
    })
}

/// Students below 19 are in high school, most 19 to 22 year olds are at
/// university, and nearly everyone older is working.
fn school_type_for_age(rng: &mut ChaCha8Rng, age: u8) -> SchoolTypeSeed {
    match age {
        0..=18 => SchoolTypeSeed::HighSchool,
        19..=22 if rng.random_ratio(4, 5) => SchoolTypeSeed::University,
        19..=22 => SchoolTypeSeed::Working,
        _ if rng.random_ratio(9, 10) => SchoolTypeSeed::Working,
        _ => SchoolTypeSeed::Other,
    }
}

fn generate_name(rng: &mut ChaCha8Rng) -> Result<(String, String), GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);
        let is_ascii_word = |part: &str| part.chars().all(|c| c.is_ascii_alphabetic());
        if is_ascii_word(&first)
            && is_ascii_word(&last)
            && is_valid_resident_name(&format!("{first} {last}"))
        {
            return Ok((first, last));
        }
    }

    Err(GenerationError::NameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const TEST_REGISTRY_JSON: &str = r#"{
        "version": 1,
        "regions": [
            {"prefecture": "東京都", "city": "渋谷区"},
            {"prefecture": "神奈川県", "city": "横浜市"},
            {"prefecture": "大阪府", "city": "大阪市"}
        ],
        "seeds": [
            {"name": "test-seed", "seed": 42, "residentCount": 25},
            {"name": "other-seed", "seed": 43, "residentCount": 25}
        ]
    }"#;

    #[fixture]
    fn test_registry() -> SeedRegistry {
        SeedRegistry::from_json(TEST_REGISTRY_JSON).expect("valid test registry")
    }

    fn residents(registry: &SeedRegistry, name: &str) -> Vec<ExampleResidentSeed> {
        let seed_def = registry.find_seed(name).expect("seed found");
        generate_example_residents(registry, seed_def).expect("generated")
    }

    #[rstest]
    fn generates_requested_count(test_registry: SeedRegistry) {
        assert_eq!(residents(&test_registry, "test-seed").len(), 25);
    }

    #[rstest]
    fn different_seeds_produce_different_residents(test_registry: SeedRegistry) {
        assert_ne!(
            residents(&test_registry, "test-seed"),
            residents(&test_registry, "other-seed")
        );
    }

    #[rstest]
    fn residents_live_in_registry_regions(test_registry: SeedRegistry) {
        for resident in residents(&test_registry, "test-seed") {
            assert!(
                test_registry
                    .regions()
                    .iter()
                    .any(|r| r.prefecture() == resident.prefecture && r.city() == resident.city),
                "unexpected region for {resident:?}"
            );
            assert!(resident.address.starts_with(&resident.prefecture));
        }
    }

    #[rstest]
    fn school_type_is_consistent_with_age(test_registry: SeedRegistry) {
        for resident in residents(&test_registry, "test-seed") {
            assert!((MIN_AGE..=MAX_AGE).contains(&resident.age));
            if resident.age <= 18 {
                assert_eq!(resident.school_type, SchoolTypeSeed::HighSchool);
            } else {
                assert_ne!(resident.school_type, SchoolTypeSeed::HighSchool);
            }
        }
    }

    #[rstest]
    fn identifiers_and_emails_are_unique(test_registry: SeedRegistry) {
        let generated = residents(&test_registry, "test-seed");
        let mut ids: Vec<_> = generated.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), generated.len());

        let mut emails: Vec<_> = generated.iter().map(|r| r.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), generated.len());
    }

    #[rstest]
    fn zero_count_yields_no_residents(test_registry: SeedRegistry) {
        let seed_def = test_registry
            .find_seed("test-seed")
            .expect("seed found")
            .with_resident_count(0);
        let generated = generate_example_residents(&test_registry, &seed_def).expect("generated");
        assert!(generated.is_empty());
    }
}
