//! Demo-seeding switches (`LOCALCONNECT_EXAMPLE_DATA_*`).

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SEED: &str = "sakura-demo";
const BUNDLED_REGISTRY: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/fixtures/example-data/seeds.json"
);

#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOCALCONNECT_EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Registry entry to apply; `sakura-demo` when unset.
    pub seed: Option<String>,
    /// Replace the seed's resident count. Zero keeps the registry value.
    pub residents: Option<usize>,
    /// Registry JSON; the bundled fixture when unset.
    pub registry: Option<PathBuf>,
}

impl ExampleDataSettings {
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn seed_name(&self) -> &str {
        self.seed.as_deref().unwrap_or(DEFAULT_SEED)
    }

    pub fn resident_override(&self) -> Option<usize> {
        self.residents.filter(|count| *count > 0)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.registry
            .clone()
            .unwrap_or_else(|| PathBuf::from(BUNDLED_REGISTRY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "LOCALCONNECT_EXAMPLE_DATA_ENABLED",
        "LOCALCONNECT_EXAMPLE_DATA_SEED",
        "LOCALCONNECT_EXAMPLE_DATA_RESIDENTS",
        "LOCALCONNECT_EXAMPLE_DATA_REGISTRY",
    ];

    fn load_with(values: [Option<&str>; 4]) -> ExampleDataSettings {
        let _guard = lock_env(
            VARS.iter()
                .zip(values)
                .map(|(key, value)| (*key, value.map(str::to_owned))),
        );
        ExampleDataSettings::load_from_iter([OsString::from("localconnect")])
            .expect("settings load")
    }

    #[rstest]
    fn unset_means_disabled_with_bundled_registry() {
        let settings = load_with([None; 4]);
        assert!(!settings.is_enabled());
        assert_eq!(settings.seed_name(), DEFAULT_SEED);
        assert_eq!(settings.resident_override(), None);
        assert!(settings.registry_path().ends_with("fixtures/example-data/seeds.json"));
    }

    #[rstest]
    fn environment_selects_seed_and_registry() {
        let settings = load_with([
            Some("true"),
            Some("small-town"),
            Some("3"),
            Some("/tmp/registry.json"),
        ]);
        assert!(settings.is_enabled());
        assert_eq!(settings.seed_name(), "small-town");
        assert_eq!(settings.resident_override(), Some(3));
        assert_eq!(settings.registry_path(), PathBuf::from("/tmp/registry.json"));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(0), None)]
    #[case(Some(12), Some(12))]
    fn zero_residents_keeps_registry_count(
        #[case] residents: Option<usize>,
        #[case] expected: Option<usize>,
    ) {
        let settings = ExampleDataSettings {
            residents,
            ..ExampleDataSettings::default()
        };
        assert_eq!(settings.resident_override(), expected);
    }
}
