//! Identifier shapes and classification
//!
//! A lookup value is either a FIPS code, an abbreviation or a free-text name.
//! `from_any` style resolution picks a strategy from the shape alone: digits
//! first, then letters, and anything else is treated as a name.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Which kind of identifier a lookup value was taken to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Fips,
    Abbreviation,
    Name,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Fips => f.write_str("FIPS code"),
            IdentifierKind::Abbreviation => f.write_str("abbreviation"),
            IdentifierKind::Name => f.write_str("name"),
        }
    }
}

/// Length of a state FIPS code
pub const STATE_FIPS_LEN: usize = 2;
/// Length of a county FIPS code within its state
pub const COUNTY_FIPS_LEN: usize = 3;
/// Length of a national county code (state + county)
pub const FULL_COUNTY_FIPS_LEN: usize = STATE_FIPS_LEN + COUNTY_FIPS_LEN;

const STATE_ABBR_LEN: RangeInclusive<usize> = 2..=2;
const COUNTY_ABBR_LEN: RangeInclusive<usize> = 2..=3;

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_letters(value: &str, len: RangeInclusive<usize>) -> bool {
    len.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Exactly two ASCII digits, e.g. "06"
pub fn is_state_fips(value: &str) -> bool {
    is_digits(value, STATE_FIPS_LEN)
}

/// Exactly three ASCII digits, e.g. "037"
pub fn is_county_local_fips(value: &str) -> bool {
    is_digits(value, COUNTY_FIPS_LEN)
}

/// Exactly five ASCII digits, e.g. "06037"
pub fn is_county_fips(value: &str) -> bool {
    is_digits(value, FULL_COUNTY_FIPS_LEN)
}

/// Exactly two ASCII letters, any case
pub fn is_state_abbr(value: &str) -> bool {
    is_letters(value, STATE_ABBR_LEN)
}

/// Two or three ASCII letters, any case
pub fn is_county_abbr(value: &str) -> bool {
    is_letters(value, COUNTY_ABBR_LEN)
}

/// Guess the identifier kind of a state lookup value
pub fn classify_state(value: &str) -> IdentifierKind {
    if is_state_fips(value) {
        IdentifierKind::Fips
    } else if is_state_abbr(value) {
        IdentifierKind::Abbreviation
    } else {
        IdentifierKind::Name
    }
}

/// Guess the identifier kind of a county lookup value
pub fn classify_county(value: &str) -> IdentifierKind {
    if is_county_fips(value) {
        IdentifierKind::Fips
    } else if is_county_abbr(value) {
        IdentifierKind::Abbreviation
    } else {
        IdentifierKind::Name
    }
}

/// Key used for name comparison: surrounding whitespace dropped, lower-cased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
