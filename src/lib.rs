//! U.S. state and county reference data
//!
//! Resolve FIPS codes, abbreviations and names to canonical state and
//! county records:
//!
//! ```
//! use us_fips::{County, State};
//!
//! let ca = State::from_any("ca").unwrap();
//! assert_eq!(ca.fips(), "06");
//! assert_eq!(ca.counties().len(), 58);
//!
//! let la = County::from_fips("06037").unwrap();
//! assert_eq!(la.name(), "Los Angeles");
//! assert_eq!(la.state(), &ca);
//! ```
//!
//! Data comes from the tables under `data/`, compiled in and parsed once.
//! [`Dataset::from_dir`] loads an alternate copy with the same layout.

pub mod county;
pub mod dataset;
pub mod error;
pub mod identifier;
pub mod state;

pub use county::{County, StateRef};
pub use dataset::{CountyRecord, Dataset, StateRecord};
pub use error::{CountyError, DatasetError, StateError};
pub use identifier::IdentifierKind;
pub use state::State;
