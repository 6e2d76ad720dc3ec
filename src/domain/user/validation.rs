//! Field shape checks for account forms
//!
//! Every check takes an optional value: an absent field is simply invalid,
//! never an error.

use validator::ValidateEmail;

/// Minimum length of given and family names
pub const NAME_MIN_LENGTH: usize = 2;
/// Maximum length of given and family names
pub const NAME_MAX_LENGTH: usize = 50;
/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 6;
/// Maximum password length
pub const PASSWORD_MAX_LENGTH: usize = 50;

/// True when the value is present and is a well-formed email address
pub fn is_email(value: Option<&str>) -> bool {
    value.is_some_and(|email| email.validate_email())
}

/// True when the value is present and its length in characters is within
/// `min..=max`
pub fn is_string_in_range(value: Option<&str>, min: usize, max: usize) -> bool {
    value.is_some_and(|text| (min..=max).contains(&text.chars().count()))
}

/// True when both values are present and equal
pub fn matches(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
