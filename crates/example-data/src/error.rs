//! Error types for the example-data crate.
//!
//! Registry parsing and resident generation each have their own `thiserror`
//! enum so callers can tell bad input files apart from generation failures.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or querying a seed registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// A region entry violates the prefecture/city constraints.
    #[error("invalid region at index {index}: {reason}")]
    InvalidRegion {
        /// Index of the invalid region in the array.
        index: usize,
        /// Which constraint failed.
        reason: String,
    },

    /// The registry lists no regions to place residents in.
    #[error("registry contains no regions")]
    EmptyRegions,

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur during resident generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to generate a valid name after maximum retries.
    #[error("failed to generate valid resident name after {max_attempts} attempts")]
    NameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// The registry contains no regions for placement.
    #[error("registry contains no regions for placement")]
    NoRegions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_io_formats_correctly() {
        let err = RegistryError::IoError {
            path: PathBuf::from("/tmp/seeds.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read registry file at '/tmp/seeds.json': file not found"
        );
    }

    #[test]
    fn registry_error_region_formats_correctly() {
        let err = RegistryError::InvalidRegion {
            index: 2,
            reason: "city must not be empty".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid region at index 2: city must not be empty"
        );
    }

    #[test]
    fn generation_error_formats_correctly() {
        let err = GenerationError::NameGenerationFailed { max_attempts: 5 };
        assert_eq!(
            err.to_string(),
            "failed to generate valid resident name after 5 attempts"
        );
    }
}
