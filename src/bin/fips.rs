//! State and county lookup from the command line
//!
//! Usage:
//!   fips state CA --counties
//!   fips county 06037 --json
//!   fips county "los angeles" --by name
//!   fips --data-dir ./data counties --state 06

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use us_fips::{County, CountyError, Dataset, State, StateError};

#[derive(Parser, Debug)]
#[command(name = "fips")]
#[command(about = "Look up U.S. states and counties by FIPS code, abbreviation or name")]
struct Args {
    /// Directory containing states.csv and counties.csv (default: built-in tables)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one state
    State {
        ident: String,

        /// Lookup strategy
        #[arg(long, value_enum, default_value = "any")]
        by: Strategy,

        /// Also list the state's counties
        #[arg(long)]
        counties: bool,
    },
    /// Resolve one county (FIPS lookups take the 5-digit code)
    County {
        ident: String,

        /// Lookup strategy
        #[arg(long, value_enum, default_value = "any")]
        by: Strategy,
    },
    /// List every state
    States,
    /// List counties, optionally only those of one state
    Counties {
        /// State FIPS code, abbreviation or name
        #[arg(long)]
        state: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    Any,
    Fips,
    Abbr,
    Name,
}

#[derive(Serialize)]
struct StateWithCounties<'a> {
    #[serde(flatten)]
    state: &'a State,
    #[serde(skip_serializing_if = "Option::is_none")]
    counties: Option<Vec<County>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let loaded;
    let dataset = match &args.data_dir {
        Some(dir) => {
            info!("Loading dataset from {}", dir.display());
            loaded = Dataset::from_dir(dir)
                .with_context(|| format!("failed to load dataset from {}", dir.display()))?;
            &loaded
        }
        None => Dataset::embedded(),
    };

    match args.command {
        Command::State {
            ident,
            by,
            counties,
        } => {
            let state = resolve_state(dataset, &ident, by)
                .with_context(|| format!("state lookup failed for '{}'", ident))?;
            let state_counties = counties.then(|| dataset.counties_of(&state));

            if args.json {
                let out = StateWithCounties {
                    state: &state,
                    counties: state_counties,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_state(&state);
                if let Some(state_counties) = &state_counties {
                    println!();
                    print_county_table(state_counties);
                }
            }
        }
        Command::County { ident, by } => {
            let county = resolve_county(dataset, &ident, by)
                .with_context(|| format!("county lookup failed for '{}'", ident))?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&county)?);
            } else {
                print_county(&county);
            }
        }
        Command::States => {
            let states = dataset.states();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&states)?);
            } else {
                println!("{:<4} {:<4} {:<26} {:<7} {:<5} {:<5}", "FIPS", "ABBR", "NAME", "ISO", "USPS", "USCG");
                println!("{}", "-".repeat(56));
                for state in &states {
                    println!(
                        "{:<4} {:<4} {:<26} {:<7} {:<5} {:<5}",
                        state.fips(),
                        state.abbreviation(),
                        state.name(),
                        state.iso(),
                        state.usps(),
                        state.uscg()
                    );
                }
            }
        }
        Command::Counties { state } => {
            let counties = match state {
                Some(ident) => {
                    let state = dataset
                        .state_by_any(&ident)
                        .with_context(|| format!("state lookup failed for '{}'", ident))?;
                    dataset.counties_of(&state)
                }
                None => dataset.counties(),
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&counties)?);
            } else {
                print_county_table(&counties);
            }
        }
    }

    Ok(())
}

fn resolve_state(dataset: &Dataset, ident: &str, by: Strategy) -> Result<State, StateError> {
    match by {
        Strategy::Any => dataset.state_by_any(ident),
        Strategy::Fips => dataset.state_by_fips(ident),
        Strategy::Abbr => dataset.state_by_abbr(ident),
        Strategy::Name => dataset.state_by_name(ident),
    }
}

fn resolve_county(dataset: &Dataset, ident: &str, by: Strategy) -> Result<County, CountyError> {
    match by {
        Strategy::Any => dataset.county_by_any(ident),
        Strategy::Fips => dataset.county_by_fips(ident),
        Strategy::Abbr => dataset.county_by_abbr(ident),
        Strategy::Name => dataset.county_by_name(ident),
    }
}

fn print_state(state: &State) {
    println!("{} ({})", state.name(), state.abbreviation());
    println!("  FIPS: {}", state.fips());
    println!("  ISO:  {}", state.iso());
    println!("  USPS: {}", state.usps());
    println!("  USCG: {}", state.uscg());
}

fn print_county(county: &County) {
    println!("{}, {}", county.name(), county.state().abbreviation());
    println!("  FIPS:  {} (county {})", county.full_fips(), county.fips());
    println!("  Abbr:  {}", county.abbreviation().unwrap_or("-"));
    println!("  State: {} ({})", county.state().name(), county.state().fips());
}

fn print_county_table(counties: &[County]) {
    println!("{:<6} {:<5} {:<32} {}", "FIPS", "ABBR", "NAME", "STATE");
    println!("{}", "-".repeat(52));
    for county in counties {
        println!(
            "{:<6} {:<5} {:<32} {}",
            county.full_fips(),
            county.abbreviation().unwrap_or("-"),
            county.name(),
            county.state().abbreviation()
        );
    }
    println!("\n{} counties", counties.len());
}
