//! State and county reference tables
//!
//! Two CSV tables back every lookup:
//!
//! - `states.csv`: `name,abbreviation,fips,iso,usps,uscg`
//! - `counties.csv`: `state,name,abbreviation,fips` where `state` is the
//!   owning state's FIPS code and `abbreviation` may be empty
//!
//! Both are compiled into the crate from `data/` and parsed on first use.
//! Rows that break the record invariants (2-digit state FIPS, 2-letter
//! uppercase state abbreviation, 3-digit county FIPS) are logged and dropped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::DatasetError;
use crate::identifier;

/// File name of the state table inside a data directory
pub const STATES_FILE: &str = "states.csv";
/// File name of the county table inside a data directory
pub const COUNTIES_FILE: &str = "counties.csv";

const STATE_COLUMNS: &[&str] = &["name", "abbreviation", "fips", "iso", "usps", "uscg"];
const COUNTY_COLUMNS: &[&str] = &["state", "name", "abbreviation", "fips"];

const EMBEDDED_STATES: &str = include_str!("../data/states.csv");
const EMBEDDED_COUNTIES: &str = include_str!("../data/counties.csv");

static EMBEDDED: LazyLock<Dataset> = LazyLock::new(|| {
    Dataset::from_csv(EMBEDDED_STATES, EMBEDDED_COUNTIES).unwrap_or_else(|err| {
        error!("Embedded dataset failed to load: {}", err);
        Dataset::default()
    })
});

/// One row of the state table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    pub abbreviation: String,
    pub fips: String,
    pub iso: String,
    pub usps: String,
    pub uscg: String,
}

/// One county entry under a state key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountyRecord {
    pub name: String,
    pub abbreviation: Option<String>,
    pub fips: String,
}

/// Raw row of the county table
#[derive(Debug, Deserialize)]
struct CountyRow {
    state: String,
    name: String,
    abbreviation: Option<String>,
    fips: String,
}

/// Read-only state and county tables
///
/// Counties are grouped by state FIPS key in the order each key first
/// appears in the source table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    states: Vec<StateRecord>,
    counties: Vec<(String, Vec<CountyRecord>)>,
    county_index: HashMap<String, usize>,
}

impl Dataset {
    /// The tables shipped with the crate, parsed once per process
    ///
    /// If the compiled-in tables fail to load, the failure is logged with
    /// `error!` and an empty dataset is returned, so every lookup fails with
    /// its not-found error instead of panicking.
    pub fn embedded() -> &'static Dataset {
        &EMBEDDED
    }

    /// Build a dataset from the text of the two CSV tables
    pub fn from_csv(states_csv: &str, counties_csv: &str) -> Result<Self, DatasetError> {
        let states = parse_states(states_csv)?;
        if states.is_empty() {
            return Err(DatasetError::NoStates);
        }

        let mut dataset = Dataset {
            states,
            ..Default::default()
        };
        for row in parse_county_rows(counties_csv)? {
            dataset.push_county(row);
        }

        debug!(
            states = dataset.states.len(),
            counties = dataset.county_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Build a dataset from `states.csv` and `counties.csv` in `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let states = read_table(dir.join(STATES_FILE))?;
        let counties = read_table(dir.join(COUNTIES_FILE))?;
        Self::from_csv(&states, &counties)
    }

    /// All state rows in source order
    pub fn state_records(&self) -> &[StateRecord] {
        &self.states
    }

    /// First state row with exactly this FIPS code
    pub fn state_record(&self, fips: &str) -> Option<&StateRecord> {
        self.states.iter().find(|s| s.fips == fips)
    }

    /// County rows filed under a state FIPS key
    pub fn county_records(&self, state_fips: &str) -> Option<&[CountyRecord]> {
        self.county_index
            .get(state_fips)
            .map(|&slot| self.counties[slot].1.as_slice())
    }

    /// (state FIPS, county rows) pairs in stored order
    pub fn county_groups(&self) -> impl Iterator<Item = (&str, &[CountyRecord])> {
        self.counties
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }

    pub fn county_count(&self) -> usize {
        self.counties.iter().map(|(_, records)| records.len()).sum()
    }

    fn push_county(&mut self, row: CountyRow) {
        if self.state_record(&row.state).is_none() {
            warn!(
                state = %row.state,
                county = %row.name,
                "Skipping county row for unknown state"
            );
            return;
        }

        let slot = match self.county_index.get(&row.state) {
            Some(&slot) => slot,
            None => {
                self.counties.push((row.state.clone(), Vec::new()));
                let slot = self.counties.len() - 1;
                self.county_index.insert(row.state.clone(), slot);
                slot
            }
        };

        self.counties[slot].1.push(CountyRecord {
            name: row.name,
            abbreviation: row.abbreviation,
            fips: row.fips,
        });
    }
}

/// Header row must name every expected column; order and extra columns are free
fn check_header(
    reader: &mut csv::Reader<&[u8]>,
    table: &'static str,
    expected: &[&str],
) -> Result<(), DatasetError> {
    let header = reader.headers()?;
    if expected.iter().all(|column| header.iter().any(|h| h == *column)) {
        return Ok(());
    }

    Err(DatasetError::Header {
        table,
        expected: expected.join(","),
        found: header.iter().collect::<Vec<_>>().join(","),
    })
}

fn read_table(path: PathBuf) -> Result<String, DatasetError> {
    fs::read_to_string(&path).map_err(|source| DatasetError::Io { path, source })
}

fn is_uppercase_ascii(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_valid_state(record: &StateRecord) -> bool {
    identifier::is_state_fips(&record.fips)
        && identifier::is_state_abbr(&record.abbreviation)
        && is_uppercase_ascii(&record.abbreviation)
}

fn is_valid_county(row: &CountyRow) -> bool {
    let abbreviation_ok = row
        .abbreviation
        .as_deref()
        .map_or(true, |a| identifier::is_county_abbr(a) && is_uppercase_ascii(a));

    identifier::is_state_fips(&row.state)
        && identifier::is_county_local_fips(&row.fips)
        && abbreviation_ok
}

fn parse_states(data: &str) -> Result<Vec<StateRecord>, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());
    check_header(&mut reader, STATES_FILE, STATE_COLUMNS)?;

    let mut states = Vec::new();
    for (i, row) in reader.deserialize::<StateRecord>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = i + 2;
        match row {
            Ok(record) if is_valid_state(&record) => states.push(record),
            Ok(record) => warn!(
                line,
                fips = %record.fips,
                abbreviation = %record.abbreviation,
                "Skipping state row with malformed FIPS code or abbreviation"
            ),
            Err(err) => warn!(line, "Skipping unreadable state row: {}", err),
        }
    }
    Ok(states)
}

fn parse_county_rows(data: &str) -> Result<Vec<CountyRow>, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());
    check_header(&mut reader, COUNTIES_FILE, COUNTY_COLUMNS)?;

    let mut rows = Vec::new();
    for (i, row) in reader.deserialize::<CountyRow>().enumerate() {
        let line = i + 2;
        match row {
            Ok(row) if is_valid_county(&row) => rows.push(row),
            Ok(row) => warn!(
                line,
                state = %row.state,
                fips = %row.fips,
                "Skipping county row with malformed FIPS code or abbreviation"
            ),
            Err(err) => warn!(line, "Skipping unreadable county row: {}", err),
        }
    }
    Ok(rows)
}
