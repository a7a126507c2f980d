//! County lookups
//!
//! A county FIPS code is only unique within its state, so lookups by code
//! take the 5-digit national form (`state + county`, e.g. "06037"). Lookups
//! by abbreviation and name scan every state in dataset order and return
//! the first match.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{CountyRecord, Dataset};
use crate::error::{CountyError, StateError};
use crate::identifier::{self, IdentifierKind, STATE_FIPS_LEN};
use crate::state::State;

/// The state a county belongs to, either already resolved or by FIPS code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateRef {
    Resolved(State),
    Fips(String),
}

impl From<State> for StateRef {
    fn from(state: State) -> Self {
        StateRef::Resolved(state)
    }
}

impl From<&State> for StateRef {
    fn from(state: &State) -> Self {
        StateRef::Resolved(state.clone())
    }
}

impl From<&str> for StateRef {
    fn from(fips: &str) -> Self {
        StateRef::Fips(fips.to_string())
    }
}

impl From<String> for StateRef {
    fn from(fips: String) -> Self {
        StateRef::Fips(fips)
    }
}

/// A county or county equivalent (parish, borough, independent city)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct County {
    name: String,
    abbreviation: Option<String>,
    fips: String,
    state: State,
}

impl County {
    /// Build a county, resolving `state` through the embedded dataset when it
    /// is given as a FIPS code.
    ///
    /// ```
    /// use us_fips::{County, State};
    ///
    /// let by_code = County::new("Test County", Some("TC"), "001", "06").unwrap();
    /// assert_eq!(by_code.state().name(), "California");
    ///
    /// let ca = State::from_abbr("CA").unwrap();
    /// let by_value = County::new("Test County", Some("TC"), "001", &ca).unwrap();
    /// assert_eq!(by_code, by_value);
    ///
    /// assert!(County::new("Test County", Some("TC"), "001", "99").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        abbreviation: Option<&str>,
        fips: impl Into<String>,
        state: impl Into<StateRef>,
    ) -> Result<County, StateError> {
        Dataset::embedded().county(name, abbreviation, fips, state)
    }

    pub(crate) fn from_record(record: &CountyRecord, state: State) -> County {
        County {
            name: record.name.clone(),
            abbreviation: record.abbreviation.clone(),
            fips: record.fips.clone(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Two or three letter abbreviation, if the county has one
    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    /// Three-digit FIPS code within the state, e.g. "037"
    pub fn fips(&self) -> &str {
        &self.fips
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Five-digit national code, e.g. "06037"
    pub fn full_fips(&self) -> String {
        format!("{}{}", self.state.fips(), self.fips)
    }

    pub fn all() -> Vec<County> {
        Dataset::embedded().counties()
    }

    pub fn from_fips(code: &str) -> Result<County, CountyError> {
        Dataset::embedded().county_by_fips(code)
    }

    pub fn from_abbr(code: &str) -> Result<County, CountyError> {
        Dataset::embedded().county_by_abbr(code)
    }

    pub fn from_name(name: &str) -> Result<County, CountyError> {
        Dataset::embedded().county_by_name(name)
    }

    /// Resolve by whatever the value looks like: 5 digits, 2-3 letters, or a name
    pub fn from_any(value: &str) -> Result<County, CountyError> {
        Dataset::embedded().county_by_any(value)
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Dataset {
    /// Build a county against this dataset; see [`County::new`]
    pub fn county(
        &self,
        name: impl Into<String>,
        abbreviation: Option<&str>,
        fips: impl Into<String>,
        state: impl Into<StateRef>,
    ) -> Result<County, StateError> {
        let state = match state.into() {
            StateRef::Resolved(state) => state,
            StateRef::Fips(code) => self.state_by_fips(&code)?,
        };

        Ok(County {
            name: name.into(),
            abbreviation: abbreviation.map(str::to_string),
            fips: fips.into(),
            state,
        })
    }

    /// Every county, grouped by state in stored order
    pub fn counties(&self) -> Vec<County> {
        let mut result = Vec::with_capacity(self.county_count());
        for (key, records) in self.county_groups() {
            let Some(state) = self.state_record(key).map(State::from) else {
                continue;
            };
            result.extend(
                records
                    .iter()
                    .map(|record| County::from_record(record, state.clone())),
            );
        }
        result
    }

    pub fn county_by_fips(&self, code: &str) -> Result<County, CountyError> {
        if !identifier::is_county_fips(code) {
            debug!(code, "Rejected malformed county FIPS code");
            return Err(CountyError::InvalidFipsCode(code.to_string()));
        }

        let (state_fips, county_fips) = code.split_at(STATE_FIPS_LEN);
        self.county_records(state_fips)
            .and_then(|records| records.iter().find(|c| c.fips == county_fips))
            .and_then(|record| {
                let state = self.state_record(state_fips)?;
                Some(County::from_record(record, State::from(state)))
            })
            .ok_or_else(|| CountyError::InvalidFipsCode(code.to_string()))
    }

    pub fn county_by_abbr(&self, code: &str) -> Result<County, CountyError> {
        if !identifier::is_county_abbr(code) {
            debug!(code, "Rejected malformed county abbreviation");
            return Err(CountyError::InvalidAbbreviation(code.to_string()));
        }

        let code_upper = code.to_ascii_uppercase();
        self.find_county(|c| c.abbreviation.as_deref() == Some(code_upper.as_str()))
            .ok_or_else(|| CountyError::InvalidAbbreviation(code.to_string()))
    }

    pub fn county_by_name(&self, name: &str) -> Result<County, CountyError> {
        let wanted = identifier::normalize_name(name);
        self.find_county(|c| identifier::normalize_name(&c.name) == wanted)
            .ok_or_else(|| CountyError::InvalidName(name.to_string()))
    }

    pub fn county_by_any(&self, value: &str) -> Result<County, CountyError> {
        let assumed = identifier::classify_county(value);
        let result = match assumed {
            IdentifierKind::Fips => self.county_by_fips(value),
            IdentifierKind::Abbreviation => self.county_by_abbr(value),
            IdentifierKind::Name => self.county_by_name(value),
        };

        result.map_err(|source| {
            debug!(value, %assumed, "County guess failed");
            CountyError::UnableToGuess {
                assumed,
                source: Box::new(source),
            }
        })
    }

    /// First county across all states matching `predicate`
    fn find_county(&self, predicate: impl Fn(&CountyRecord) -> bool) -> Option<County> {
        self.county_groups().find_map(|(key, records)| {
            let record = records.iter().find(|&c| predicate(c))?;
            let state = self.state_record(key)?;
            Some(County::from_record(record, State::from(state)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_los_angeles(county: &County) {
        assert_eq!(county.name(), "Los Angeles");
        assert_eq!(county.abbreviation(), Some("LA"));
        assert_eq!(county.fips(), "037");
        assert_eq!(county.full_fips(), "06037");
        assert_eq!(county.state().name(), "California");
        assert_eq!(county.state().fips(), "06");
        assert_eq!(county.state().uscg(), "CF");
    }

    #[test]
    fn test_constructor() {
        let county = County::new("Test County", Some("TC"), "01", "06").unwrap();
        assert_eq!(county.name(), "Test County");
        assert_eq!(county.abbreviation(), Some("TC"));
        assert_eq!(county.fips(), "01");
        assert_eq!(county.state().name(), "California");
        assert_eq!(county.to_string(), "Test County");

        let err = County::new("Test County", Some("TC"), "01", "State").unwrap_err();
        assert_eq!(err, StateError::InvalidFipsCode("State".to_string()));
    }

    #[test]
    fn test_constructor_unknown_state() {
        let err = County::new("Test", Some("TC"), "01", "99").unwrap_err();
        assert_eq!(err.code(), 1);
        assert!(matches!(err, StateError::InvalidFipsCode(_)));
    }

    #[test]
    fn test_constructor_with_state_value() {
        let state = State::new("Test State", "TS", "00", "US-TS", "TS", "TS");
        let county = County::new("Test County", None, "001", state.clone()).unwrap();
        assert_eq!(county.state(), &state);
        assert_eq!(county.abbreviation(), None);
    }

    #[test]
    fn test_all() {
        let counties = County::all();
        assert_eq!(counties.len(), 3143);
        assert_eq!(counties[0].full_fips(), "01001");
        assert_eq!(counties.last().unwrap().full_fips(), "56045");
    }

    #[test]
    fn test_from_fips() {
        assert_los_angeles(&County::from_fips("06037").unwrap());
        assert_eq!(County::from_fips("51760").unwrap().name(), "Richmond city");
        assert_eq!(County::from_fips("51159").unwrap().name(), "Richmond");
    }

    #[test]
    fn test_from_fips_invalid() {
        for code in ["99999", "06999", "6037", "060370", "0603A"] {
            let err = County::from_fips(code).unwrap_err();
            assert_eq!(err, CountyError::InvalidFipsCode(code.to_string()));
            assert_eq!(err.code(), 1);
        }
    }

    #[test]
    fn test_from_abbr() {
        assert_los_angeles(&County::from_abbr("LA").unwrap());
        assert_los_angeles(&County::from_abbr("la").unwrap());
        assert_eq!(County::from_abbr("SBD").unwrap().name(), "San Bernardino");
    }

    #[test]
    fn test_from_abbr_invalid() {
        for code in ["XX", "ABCD", "L", "L1"] {
            let err = County::from_abbr(code).unwrap_err();
            assert_eq!(err.code(), 2, "{}", code);
        }
    }

    #[test]
    fn test_from_name() {
        assert_los_angeles(&County::from_name("Los Angeles").unwrap());
        assert_los_angeles(&County::from_name(" los angeles  ").unwrap());
        // first match in dataset order
        let washington = County::from_name("Washington").unwrap();
        assert_eq!(washington.full_fips(), "01129");
    }

    #[test]
    fn test_from_name_invalid() {
        let err = County::from_name("Invalid").unwrap_err();
        assert_eq!(err, CountyError::InvalidName("Invalid".to_string()));
        assert_eq!(err.code(), 3);
    }

    #[test]
    fn test_from_any() {
        let by_fips = County::from_any("06037").unwrap();
        let by_abbr = County::from_any("LA").unwrap();
        let by_name = County::from_any("Los Angeles").unwrap();
        assert_los_angeles(&by_fips);
        assert_eq!(by_fips, by_abbr);
        assert_eq!(by_abbr, by_name);
    }

    #[test]
    fn test_from_any_invalid() {
        let err = County::from_any("Invalid").unwrap_err();
        assert_eq!(err.code(), 4);
        match err {
            CountyError::UnableToGuess { assumed, source } => {
                assert_eq!(assumed, IdentifierKind::Name);
                assert_eq!(source.code(), 3);
            }
            other => panic!("expected guess error, got {:?}", other),
        }

        assert_eq!(County::from_any("99999").unwrap_err().kind(), IdentifierKind::Fips);
        assert_eq!(County::from_any("ZZZ").unwrap_err().kind(), IdentifierKind::Abbreviation);
    }

    #[test]
    fn test_custom_dataset() {
        let data = Dataset::from_csv(
            "name,abbreviation,fips,iso,usps,uscg\nAlpha,AA,01,US-AA,AA,AA\n",
            "state,name,abbreviation,fips\n01,Gamma,GM,003\n",
        )
        .unwrap();

        let gamma = data.county_by_fips("01003").unwrap();
        assert_eq!(gamma.state().name(), "Alpha");
        assert_eq!(data.county_by_abbr("gm").unwrap(), gamma);
        assert_eq!(data.counties(), vec![gamma]);

        // constructor resolves against the dataset it is called on
        assert!(data.county("Delta", None, "005", "01").is_ok());
        assert!(data.county("Delta", None, "005", "06").is_err());
    }
}
