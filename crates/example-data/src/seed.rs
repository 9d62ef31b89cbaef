//! Generated resident seed types.
//!
//! These types are independent of backend domain types; the backend converts
//! them into users and profiles at the point of use.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gender recorded on a generated profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderSeed {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
    /// The resident chose not to say.
    PreferNotToSay,
}

impl GenderSeed {
    /// Stable string form shared with the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

/// School or work status recorded on a generated profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolTypeSeed {
    /// High school student.
    HighSchool,
    /// University student.
    University,
    /// Working adult.
    Working,
    /// Anything else.
    Other,
}

impl SchoolTypeSeed {
    /// Stable string form shared with the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::University => "university",
            Self::Working => "working",
            Self::Other => "other",
        }
    }
}

/// A generated example resident: an account plus its profile.
///
/// # Example
///
/// ```
/// use example_data::{ExampleResidentSeed, GenderSeed, SchoolTypeSeed};
/// use uuid::Uuid;
///
/// let resident = ExampleResidentSeed {
///     id: Uuid::nil(),
///     external_id: "example|00000000-0000-0000-0000-000000000000".to_owned(),
///     name: "Ada Lovelace".to_owned(),
///     email: "ada.lovelace@example.jp".to_owned(),
///     age: 36,
///     gender: GenderSeed::Female,
///     school_type: SchoolTypeSeed::Working,
///     prefecture: "東京都".to_owned(),
///     city: "渋谷区".to_owned(),
///     address: "東京都渋谷区".to_owned(),
/// };
///
/// assert_eq!(resident.gender.as_str(), "female");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleResidentSeed {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// External login identifier the resident authenticates with.
    pub external_id: String,
    /// Human-readable name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Age in years.
    pub age: u8,
    /// Gender recorded on the profile.
    pub gender: GenderSeed,
    /// School or work status.
    pub school_type: SchoolTypeSeed,
    /// Prefecture of residence.
    pub prefecture: String,
    /// City or ward of residence.
    pub city: String,
    /// Street address, starting with the prefecture.
    pub address: String,
}
