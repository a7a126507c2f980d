//! Error types for state and county resolution
//!
//! States and counties each carry their own taxonomy with the same four
//! variants. Every variant has a stable numeric code so callers that only
//! keep the code (logs, FFI, HTTP payloads) can still tell them apart:
//!
//! | code | variant               |
//! |------|-----------------------|
//! | 1    | `InvalidFipsCode`     |
//! | 2    | `InvalidAbbreviation` |
//! | 3    | `InvalidName`         |
//! | 4    | `UnableToGuess`       |
//!
//! A malformed identifier and a well-formed one with no match produce the
//! same variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::identifier::IdentifierKind;

/// Errors returned by state lookups
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Malformed or unknown 2-digit FIPS code.
    #[error("no state found with FIPS code: {0}")]
    InvalidFipsCode(String),

    /// Malformed or unknown 2-letter abbreviation.
    #[error("no state found with abbreviation: {0}")]
    InvalidAbbreviation(String),

    /// No state has this name.
    #[error("no state found with name: {0}")]
    InvalidName(String),

    /// `from_any` picked a strategy from the value's shape and it failed.
    #[error("unable to guess state: lookup by {assumed} failed")]
    UnableToGuess {
        assumed: IdentifierKind,
        source: Box<StateError>,
    },
}

impl StateError {
    /// Stable numeric code, 1 through 4 in variant order.
    pub fn code(&self) -> u8 {
        match self {
            StateError::InvalidFipsCode(_) => 1,
            StateError::InvalidAbbreviation(_) => 2,
            StateError::InvalidName(_) => 3,
            StateError::UnableToGuess { .. } => 4,
        }
    }

    /// The identifier kind this error is about; the assumed kind for guesses.
    pub fn kind(&self) -> IdentifierKind {
        match self {
            StateError::InvalidFipsCode(_) => IdentifierKind::Fips,
            StateError::InvalidAbbreviation(_) => IdentifierKind::Abbreviation,
            StateError::InvalidName(_) => IdentifierKind::Name,
            StateError::UnableToGuess { assumed, .. } => *assumed,
        }
    }

    /// Returns true if this error came out of `from_any`.
    pub fn is_guess(&self) -> bool {
        matches!(self, StateError::UnableToGuess { .. })
    }

    /// The lookup failure wrapped by `UnableToGuess`
    pub fn underlying(&self) -> Option<&StateError> {
        match self {
            StateError::UnableToGuess { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors returned by county lookups
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CountyError {
    /// Malformed or unknown 5-digit FIPS code.
    #[error("no county found with FIPS code: {0}")]
    InvalidFipsCode(String),

    /// Malformed or unknown 2-3 letter abbreviation.
    #[error("no county found with abbreviation: {0}")]
    InvalidAbbreviation(String),

    /// No county has this name.
    #[error("no county found with name: {0}")]
    InvalidName(String),

    /// `from_any` picked a strategy from the value's shape and it failed.
    #[error("unable to guess county: lookup by {assumed} failed")]
    UnableToGuess {
        assumed: IdentifierKind,
        source: Box<CountyError>,
    },
}

impl CountyError {
    /// Stable numeric code, 1 through 4 in variant order.
    pub fn code(&self) -> u8 {
        match self {
            CountyError::InvalidFipsCode(_) => 1,
            CountyError::InvalidAbbreviation(_) => 2,
            CountyError::InvalidName(_) => 3,
            CountyError::UnableToGuess { .. } => 4,
        }
    }

    /// The identifier kind this error is about; the assumed kind for guesses.
    pub fn kind(&self) -> IdentifierKind {
        match self {
            CountyError::InvalidFipsCode(_) => IdentifierKind::Fips,
            CountyError::InvalidAbbreviation(_) => IdentifierKind::Abbreviation,
            CountyError::InvalidName(_) => IdentifierKind::Name,
            CountyError::UnableToGuess { assumed, .. } => *assumed,
        }
    }

    /// Returns true if this error came out of `from_any`.
    pub fn is_guess(&self) -> bool {
        matches!(self, CountyError::UnableToGuess { .. })
    }

    /// The lookup failure wrapped by `UnableToGuess`
    pub fn underlying(&self) -> Option<&CountyError> {
        match self {
            CountyError::UnableToGuess { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors building a [`Dataset`](crate::Dataset) from caller-supplied tables
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{table} header must name columns {expected}, found: {found}")]
    Header {
        table: &'static str,
        expected: String,
        found: String,
    },

    #[error("malformed dataset table: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset contains no valid state records")]
    NoStates,
}
