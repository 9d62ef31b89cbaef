//! User profile: demographics and residence.
//!
//! Profiles are optional and 1:1 with accounts. When an address is supplied
//! without an explicit prefecture, the prefecture is derived from the
//! address prefix.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{Error, UserId, extract_prefecture_from_address};

/// Maximum accepted age.
pub const AGE_MAX: u8 = 150;
/// Maximum prefecture length in characters.
pub const PREFECTURE_MAX: usize = 50;
/// Maximum city length in characters.
pub const CITY_MAX: usize = 100;
/// Maximum occupation length in characters.
pub const OCCUPATION_MAX: usize = 100;

/// Validation errors for profile fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("age must be between 0 and {max}")]
    AgeOutOfRange { max: u8 },
    #[error("unknown gender: {value}")]
    UnknownGender { value: String },
    #[error("unknown school type: {value}")]
    UnknownSchoolType { value: String },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl ProfileValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::AgeOutOfRange { .. } => "age",
            Self::UnknownGender { .. } => "gender",
            Self::UnknownSchoolType { .. } => "schoolType",
            Self::TooLong { field, .. } => field,
        }
    }
}

impl From<ProfileValidationError> for Error {
    fn from(err: ProfileValidationError) -> Self {
        let code = match &err {
            ProfileValidationError::AgeOutOfRange { .. } => "out_of_range",
            ProfileValidationError::UnknownGender { .. }
            | ProfileValidationError::UnknownSchoolType { .. } => "unknown_value",
            ProfileValidationError::TooLong { .. } => "too_long",
        };
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": code,
        }))
    }
}

/// Age in whole years, 0..=150.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    pub fn new(value: i64) -> Result<Self, ProfileValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|age| *age <= AGE_MAX)
            .map(Self)
            .ok_or(ProfileValidationError::AgeOutOfRange { max: AGE_MAX })
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Self-described gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

impl FromStr for Gender {
    type Err = ProfileValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            "prefer_not_to_say" => Ok(Self::PreferNotToSay),
            other => Err(ProfileValidationError::UnknownGender {
                value: other.to_owned(),
            }),
        }
    }
}

/// School or work status, used by gift restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolType {
    HighSchool,
    University,
    Working,
    Other,
}

impl SchoolType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::University => "university",
            Self::Working => "working",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolType {
    type Err = ProfileValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "high_school" => Ok(Self::HighSchool),
            "university" => Ok(Self::University),
            "working" => Ok(Self::Working),
            "other" => Ok(Self::Other),
            other => Err(ProfileValidationError::UnknownSchoolType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Stored profile for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    pub school_type: Option<SchoolType>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    pub school_type: Option<SchoolType>,
}

impl ProfileDraft {
    /// Build the stored profile, deriving the prefecture from the address
    /// when none was given.
    pub fn into_profile(self, user_id: UserId, now: DateTime<Utc>) -> UserProfile {
        let prefecture = self
            .prefecture
            .or_else(|| derived_prefecture(self.address.as_deref()));
        UserProfile {
            user_id,
            age: self.age,
            gender: self.gender,
            address: self.address,
            prefecture,
            city: self.city,
            occupation: self.occupation,
            school_type: self.school_type,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    pub school_type: Option<SchoolType>,
}

impl ProfilePatch {
    /// Apply the patch to `profile`.
    ///
    /// A new address without a new prefecture re-derives the prefecture; an
    /// address with no recognisable prefecture keeps the stored one.
    pub fn apply(self, mut profile: UserProfile, now: DateTime<Utc>) -> UserProfile {
        let derived = match (&self.prefecture, &self.address) {
            (None, Some(address)) => derived_prefecture(Some(address)),
            _ => None,
        };

        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(gender) = self.gender {
            profile.gender = Some(gender);
        }
        if let Some(address) = self.address {
            profile.address = Some(address);
        }
        if let Some(prefecture) = self.prefecture.or(derived) {
            profile.prefecture = Some(prefecture);
        }
        if let Some(city) = self.city {
            profile.city = Some(city);
        }
        if let Some(occupation) = self.occupation {
            profile.occupation = Some(occupation);
        }
        if let Some(school_type) = self.school_type {
            profile.school_type = Some(school_type);
        }
        profile.updated_at = now;
        profile
    }
}

fn derived_prefecture(address: Option<&str>) -> Option<String> {
    address
        .and_then(extract_prefecture_from_address)
        .map(|prefecture| prefecture.name.to_owned())
}

/// Check an optional free-text field against a character limit.
pub fn bounded_text(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ProfileValidationError> {
    match value {
        Some(text) if text.chars().count() > max => {
            Err(ProfileValidationError::TooLong { field, max })
        }
        other => Ok(other),
    }
}
