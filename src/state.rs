//! State lookups
//!
//! Every lookup returns a fresh owned [`State`]. The associated functions on
//! `State` resolve against the embedded dataset; the `state_*` methods on
//! [`Dataset`] do the same against any loaded dataset.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::county::County;
use crate::dataset::{Dataset, StateRecord};
use crate::error::StateError;
use crate::identifier::{self, IdentifierKind};

/// A U.S. state, district or territory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    name: String,
    abbreviation: String,
    fips: String,
    iso: String,
    usps: String,
    uscg: String,
}

impl State {
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        fips: impl Into<String>,
        iso: impl Into<String>,
        usps: impl Into<String>,
        uscg: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            fips: fips.into(),
            iso: iso.into(),
            usps: usps.into(),
            uscg: uscg.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Two-letter ANSI abbreviation, e.g. "CA"
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Two-digit ANSI FIPS code, e.g. "06"
    pub fn fips(&self) -> &str {
        &self.fips
    }

    /// ISO 3166-2 subdivision code, e.g. "US-CA"
    pub fn iso(&self) -> &str {
        &self.iso
    }

    /// U.S. Postal Service code
    pub fn usps(&self) -> &str {
        &self.usps
    }

    /// U.S. Coast Guard code, e.g. "CF" for California
    pub fn uscg(&self) -> &str {
        &self.uscg
    }

    pub fn all() -> Vec<State> {
        Dataset::embedded().states()
    }

    pub fn from_fips(code: &str) -> Result<State, StateError> {
        Dataset::embedded().state_by_fips(code)
    }

    pub fn from_abbr(code: &str) -> Result<State, StateError> {
        Dataset::embedded().state_by_abbr(code)
    }

    pub fn from_name(name: &str) -> Result<State, StateError> {
        Dataset::embedded().state_by_name(name)
    }

    /// Resolve by whatever the value looks like: 2 digits, 2 letters, or a name
    pub fn from_any(value: &str) -> Result<State, StateError> {
        Dataset::embedded().state_by_any(value)
    }

    /// Counties of this state, each owning a copy of it
    pub fn counties(&self) -> Vec<County> {
        Dataset::embedded().counties_of(self)
    }
}

impl From<&StateRecord> for State {
    fn from(record: &StateRecord) -> Self {
        State::new(
            record.name.as_str(),
            record.abbreviation.as_str(),
            record.fips.as_str(),
            record.iso.as_str(),
            record.usps.as_str(),
            record.uscg.as_str(),
        )
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Dataset {
    pub fn states(&self) -> Vec<State> {
        self.state_records().iter().map(State::from).collect()
    }

    pub fn state_by_fips(&self, code: &str) -> Result<State, StateError> {
        if !identifier::is_state_fips(code) {
            debug!(code, "Rejected malformed state FIPS code");
            return Err(StateError::InvalidFipsCode(code.to_string()));
        }

        self.state_record(code)
            .map(State::from)
            .ok_or_else(|| StateError::InvalidFipsCode(code.to_string()))
    }

    pub fn state_by_abbr(&self, code: &str) -> Result<State, StateError> {
        if !identifier::is_state_abbr(code) {
            debug!(code, "Rejected malformed state abbreviation");
            return Err(StateError::InvalidAbbreviation(code.to_string()));
        }

        let code_upper = code.to_ascii_uppercase();
        self.state_records()
            .iter()
            .find(|s| s.abbreviation == code_upper)
            .map(State::from)
            .ok_or_else(|| StateError::InvalidAbbreviation(code.to_string()))
    }

    pub fn state_by_name(&self, name: &str) -> Result<State, StateError> {
        let wanted = identifier::normalize_name(name);
        self.state_records()
            .iter()
            .find(|s| identifier::normalize_name(&s.name) == wanted)
            .map(State::from)
            .ok_or_else(|| StateError::InvalidName(name.to_string()))
    }

    pub fn state_by_any(&self, value: &str) -> Result<State, StateError> {
        let assumed = identifier::classify_state(value);
        let result = match assumed {
            IdentifierKind::Fips => self.state_by_fips(value),
            IdentifierKind::Abbreviation => self.state_by_abbr(value),
            IdentifierKind::Name => self.state_by_name(value),
        };

        result.map_err(|source| {
            debug!(value, %assumed, "State guess failed");
            StateError::UnableToGuess {
                assumed,
                source: Box::new(source),
            }
        })
    }

    /// Counties filed under `state.fips()`; empty when the state has none
    pub fn counties_of(&self, state: &State) -> Vec<County> {
        match self.county_records(state.fips()) {
            Some(records) => records
                .iter()
                .map(|record| County::from_record(record, state.clone()))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_california(state: &State) {
        assert_eq!(state.name(), "California");
        assert_eq!(state.abbreviation(), "CA");
        assert_eq!(state.fips(), "06");
        assert_eq!(state.iso(), "US-CA");
        assert_eq!(state.usps(), "CA");
        assert_eq!(state.uscg(), "CF");
    }

    #[test]
    fn test_constructor() {
        let state = State::new("Test State", "TS", "01", "US-TS", "T2", "T3");
        assert_eq!(state.name(), "Test State");
        assert_eq!(state.abbreviation(), "TS");
        assert_eq!(state.fips(), "01");
        assert_eq!(state.iso(), "US-TS");
        assert_eq!(state.usps(), "T2");
        assert_eq!(state.uscg(), "T3");
        assert_eq!(state.to_string(), "Test State");
    }

    #[test]
    fn test_all() {
        let states = State::all();
        assert_eq!(states.len(), 56);
        assert_eq!(states[0].name(), "Alabama");
        assert_eq!(states.last().unwrap().abbreviation(), "VI");
    }

    #[test]
    fn test_from_fips() {
        assert_california(&State::from_fips("06").unwrap());
        for state in State::all() {
            assert_eq!(State::from_fips(state.fips()).unwrap().fips(), state.fips());
        }
    }

    #[test]
    fn test_from_fips_invalid() {
        for code in ["99", "6", "006", "CA", "", " 06"] {
            let err = State::from_fips(code).unwrap_err();
            assert_eq!(err, StateError::InvalidFipsCode(code.to_string()));
            assert_eq!(err.code(), 1);
        }
    }

    #[test]
    fn test_from_abbr() {
        assert_california(&State::from_abbr("CA").unwrap());
        assert_eq!(State::from_abbr("ca").unwrap(), State::from_abbr("CA").unwrap());
        assert_eq!(State::from_abbr("cA").unwrap().fips(), "06");
    }

    #[test]
    fn test_from_abbr_invalid() {
        for code in ["XX", "CAL", "C", "06"] {
            let err = State::from_abbr(code).unwrap_err();
            assert_eq!(err.code(), 2, "{}", code);
        }
    }

    #[test]
    fn test_from_name() {
        assert_california(&State::from_name("California").unwrap());
        assert_eq!(
            State::from_name("  california ").unwrap(),
            State::from_name("California").unwrap()
        );
        assert_eq!(State::from_name("NEW YORK").unwrap().fips(), "36");
    }

    #[test]
    fn test_from_name_invalid() {
        let err = State::from_name("Invalid").unwrap_err();
        assert_eq!(err, StateError::InvalidName("Invalid".to_string()));
        assert_eq!(err.code(), 3);
        // no partial matching
        assert!(State::from_name("Califor").is_err());
    }

    #[test]
    fn test_from_any() {
        let by_fips = State::from_any("06").unwrap();
        let by_abbr = State::from_any("CA").unwrap();
        let by_name = State::from_any("California").unwrap();
        assert_california(&by_fips);
        assert_eq!(by_fips, by_abbr);
        assert_eq!(by_abbr, by_name);
    }

    #[test]
    fn test_from_any_invalid() {
        let err = State::from_any("Invalid").unwrap_err();
        assert_eq!(err.code(), 4);
        match err {
            StateError::UnableToGuess { assumed, source } => {
                assert_eq!(assumed, IdentifierKind::Name);
                assert_eq!(*source, StateError::InvalidName("Invalid".to_string()));
            }
            other => panic!("expected guess error, got {:?}", other),
        }

        let err = State::from_any("99").unwrap_err();
        assert_eq!(err.kind(), IdentifierKind::Fips);
        let err = State::from_any("XX").unwrap_err();
        assert_eq!(err.kind(), IdentifierKind::Abbreviation);
    }

    #[test]
    fn test_counties() {
        let california = State::from_name("California").unwrap();
        let counties = california.counties();
        assert_eq!(counties.len(), 58);
        assert!(counties.iter().all(|c| c.state() == &california));
        assert_eq!(counties[0].name(), "Alameda");
    }

    #[test]
    fn test_counties_missing_key_is_empty() {
        assert!(State::from_abbr("GU").unwrap().counties().is_empty());
        let made_up = State::new("Nowhere", "NW", "98", "US-NW", "NW", "NW");
        assert!(made_up.counties().is_empty());
    }
}
