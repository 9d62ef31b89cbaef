//! Validation rules mirroring backend constraints.
//!
//! Keeping these bounds in sync with the backend's user and profile types
//! ensures generated residents are always accepted on insert.

/// Maximum number of characters in a resident name.
pub const NAME_MAX: usize = 64;

/// Maximum number of characters in a prefecture name.
pub const PREFECTURE_MAX: usize = 50;

/// Maximum number of characters in a city name.
pub const CITY_MAX: usize = 100;

/// Validates a resident name against backend constraints.
///
/// A valid name is non-blank, at most [`NAME_MAX`] characters long, and
/// contains no control characters.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_resident_name;
///
/// assert!(is_valid_resident_name("Ada Lovelace"));
/// assert!(!is_valid_resident_name("   "));
/// assert!(!is_valid_resident_name("tab\there"));
/// ```
#[must_use]
pub fn is_valid_resident_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }
    if name.chars().count() > NAME_MAX {
        return false;
    }
    !name.chars().any(char::is_control)
}

/// Returns the first violated region constraint, if any.
pub(crate) fn region_violation(prefecture: &str, city: &str) -> Option<String> {
    if prefecture.trim().is_empty() {
        return Some("prefecture must not be empty".to_owned());
    }
    if prefecture.chars().count() > PREFECTURE_MAX {
        return Some(format!("prefecture exceeds {PREFECTURE_MAX} characters"));
    }
    if city.trim().is_empty() {
        return Some("city must not be empty".to_owned());
    }
    if city.chars().count() > CITY_MAX {
        return Some(format!("city exceeds {CITY_MAX} characters"));
    }
    None
}
