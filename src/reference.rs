//! Capacity reference tables: seat capacity per airline/aircraft and
//! passenger load factor per airline.
//!
//! Tables are loaded once per run and read-only afterwards. The aircraft
//! capacity and load-factor tables must carry an `"AVG"` entry, which the
//! resolvers fall back to when no specific key matches.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

use crate::constants::{AIRCRAFT_CAP_TABLE, AIRLINE_CAP_TABLE, AVG_KEY, PLF_TABLE};
use crate::error::{PipelineError, Result};

pub type LookupTable = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityTables {
    airline_cap: LookupTable,
    aircraft_cap: LookupTable,
    plf: LookupTable,
}

impl CapacityTables {
    /// Builds validated tables.
    ///
    /// Fails with `MissingReferenceData` when `aircraft_cap` or `plf` lacks
    /// `"AVG"`, and with `InvalidReferenceData` for negative or non-finite
    /// capacities and load factors outside 0–100.
    pub fn new(airline_cap: LookupTable, aircraft_cap: LookupTable, plf: LookupTable) -> Result<Self> {
        for (table, values) in [(AIRLINE_CAP_TABLE, &airline_cap), (AIRCRAFT_CAP_TABLE, &aircraft_cap)] {
            validate_values(table, values, |v| v >= 0.0)?;
        }
        validate_values(PLF_TABLE, &plf, |v| (0.0..=100.0).contains(&v))?;

        require_fallback(AIRCRAFT_CAP_TABLE, &aircraft_cap)?;
        require_fallback(PLF_TABLE, &plf)?;

        debug!(
            airline_cap = airline_cap.len(),
            aircraft_cap = aircraft_cap.len(),
            plf = plf.len(),
            "Capacity tables validated"
        );

        Ok(Self {
            airline_cap,
            aircraft_cap,
            plf,
        })
    }

    /// Parses the three reference CSVs (see [`AirlineCapacityRow`] and friends).
    pub fn from_readers(airline: impl Read, aircraft: impl Read, plf: impl Read) -> Result<Self> {
        let airline_cap = read_table(airline, |row: AirlineCapacityRow| {
            (format!("{}{}", row.prefix, row.mainsub), row.airline_cap)
        })?;
        let aircraft_cap = read_table(aircraft, |row: AircraftCapacityRow| (row.mainsub, row.aircraft_cap))?;
        let plf = read_table(plf, |row: LoadFactorRow| (row.code, row.plf))?;

        Self::new(airline_cap, aircraft_cap, plf)
    }

    pub fn airline_cap(&self) -> &LookupTable {
        &self.airline_cap
    }

    pub fn aircraft_cap(&self) -> &LookupTable {
        &self.aircraft_cap
    }

    pub fn plf(&self) -> &LookupTable {
        &self.plf
    }

    /// The global seat-capacity fallback
    pub fn average_capacity(&self) -> f64 {
        self.aircraft_cap[AVG_KEY]
    }

    /// The global load-factor fallback, as a percentage
    pub fn average_plf(&self) -> f64 {
        self.plf[AVG_KEY]
    }
}

/// Row of `airline_capacity.csv`; keyed by `prefix + mainsub` (e.g. `KL73H`)
#[derive(Debug, Deserialize)]
pub struct AirlineCapacityRow {
    pub prefix: String,
    pub mainsub: String,
    pub airline_cap: f64,
}

/// Row of `aircraft_capacity.csv`; keyed by `mainsub` (e.g. `73H`, `AVG`)
#[derive(Debug, Deserialize)]
pub struct AircraftCapacityRow {
    pub mainsub: String,
    pub aircraft_cap: f64,
}

/// Row of `passenger_load_factor.csv`; keyed by carrier `code`
#[derive(Debug, Deserialize)]
pub struct LoadFactorRow {
    pub code: String,
    /// Carrier name; informational only
    pub airline: Option<String>,
    pub plf: f64,
}

fn read_table<R, T, F>(reader: R, key_value: F) -> Result<LookupTable>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
    F: Fn(T) -> (String, f64),
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = LookupTable::new();
    for row in csv_reader.deserialize::<T>() {
        let (key, value) = key_value(row?);
        if let Some(previous) = table.insert(key.clone(), value) {
            warn!("Duplicate reference key '{}' ({} replaced by {})", key, previous, value);
        }
    }
    Ok(table)
}

fn require_fallback(table: &'static str, values: &LookupTable) -> Result<()> {
    if values.contains_key(AVG_KEY) {
        Ok(())
    } else {
        Err(PipelineError::MissingReferenceData {
            table,
            key: AVG_KEY.to_string(),
        })
    }
}

fn validate_values(table: &'static str, values: &LookupTable, in_range: impl Fn(f64) -> bool) -> Result<()> {
    match values
        .iter()
        .find(|(_, v)| !v.is_finite() || !in_range(**v))
    {
        Some((key, value)) => Err(PipelineError::InvalidReferenceData {
            table,
            key: key.clone(),
            value: *value,
        }),
        None => Ok(()),
    }
}
