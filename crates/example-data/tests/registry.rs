//! Integration tests for seed registry parsing and file loading.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::fs;
use std::path::PathBuf;

use example_data::{RegistryError, SeedRegistry, generate_example_residents};
use rstest::rstest;

const VALID_JSON: &str = r#"{
    "version": 1,
    "regions": [
        {"prefecture": "東京都", "city": "渋谷区"},
        {"prefecture": "京都府", "city": "京都市"}
    ],
    "seeds": [
        {"name": "shibuya-crow", "seed": 2026, "residentCount": 12},
        {"name": "kyoto-heron", "seed": 1234, "residentCount": 5}
    ]
}"#;

#[test]
fn parses_valid_registry() {
    let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");

    assert_eq!(registry.version(), 1);
    assert_eq!(registry.regions().len(), 2);
    assert_eq!(registry.seeds().len(), 2);
}

#[test]
fn finds_seed_by_name() {
    let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");
    let seed = registry.find_seed("shibuya-crow").expect("seed found");

    assert_eq!(seed.name(), "shibuya-crow");
    assert_eq!(seed.seed(), 2026);
    assert_eq!(seed.resident_count(), 12);
}

#[test]
fn returns_error_for_unknown_seed() {
    let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");

    assert_eq!(
        registry.find_seed("unknown"),
        Err(RegistryError::SeedNotFound {
            name: "unknown".to_owned()
        })
    );
}

#[rstest]
#[case::malformed_json("not valid json")]
#[case::missing_regions(r#"{"version": 1, "seeds": [{"name": "a", "seed": 1, "residentCount": 1}]}"#)]
fn rejects_json_with_parse_error(#[case] json: &str) {
    let result = SeedRegistry::from_json(json);
    assert!(matches!(result, Err(RegistryError::ParseError { .. })));
}

#[rstest]
#[case::unsupported_version(
    r#"{"version": 2, "regions": [{"prefecture": "東京都", "city": "港区"}], "seeds": [{"name": "a", "seed": 1, "residentCount": 1}]}"#,
    RegistryError::UnsupportedVersion { expected: 1, actual: 2 }
)]
#[case::empty_regions(
    r#"{"version": 1, "regions": [], "seeds": [{"name": "a", "seed": 1, "residentCount": 1}]}"#,
    RegistryError::EmptyRegions
)]
#[case::empty_seeds(
    r#"{"version": 1, "regions": [{"prefecture": "東京都", "city": "港区"}], "seeds": []}"#,
    RegistryError::EmptySeeds
)]
fn rejects_registry_with_specific_error(#[case] json: &str, #[case] expected: RegistryError) {
    assert_eq!(SeedRegistry::from_json(json), Err(expected));
}

#[test]
fn loads_registry_from_file_and_generates() {
    let dir = std::env::temp_dir().join(format!("example-data-registry-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("seeds.json");
    fs::write(&path, VALID_JSON).expect("write registry");

    let registry = SeedRegistry::from_file(&path).expect("registry loads");
    let seed = registry.find_seed("kyoto-heron").expect("seed found");
    let residents = generate_example_residents(&registry, seed).expect("generated");
    assert_eq!(residents.len(), 5);

    fs::remove_dir_all(&dir).expect("clean up temp dir");
}

#[test]
fn missing_file_reports_io_error() {
    let path = PathBuf::from("/nonexistent/localconnect/seeds.json");
    let result = SeedRegistry::from_file(&path);
    assert!(matches!(result, Err(RegistryError::IoError { .. })));
}
