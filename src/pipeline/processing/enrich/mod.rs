pub mod airline;
pub mod capacity;
pub mod load_factor;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use crate::domain::{EnrichedRecord, FlightRecord};
use crate::error::{PipelineError, Result};
use crate::observability::metrics;
use crate::reference::CapacityTables;

use self::airline::{resolve_airline, AirlineError};
use self::capacity::{resolve_capacity, CapacityTier};
use self::load_factor::{resolve_load_factor, LoadFactorSource};

/// What to do with a row whose derived fields cannot be computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFailurePolicy {
    /// Abort the whole batch on the first bad row
    #[default]
    FailFast,
    /// Drop the row, log it and keep going
    SkipAndLog,
}

/// A row-level enrichment failure, before it is tied to a row index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub field: &'static str,
    pub reason: String,
}

impl From<AirlineError> for RowError {
    fn from(err: AirlineError) -> Self {
        match err {
            AirlineError::MissingMainFlight => RowError {
                field: "mainFlight",
                reason: "no prefixIATA and no flight number to derive the airline from".to_string(),
            },
        }
    }
}

/// Trait for turning flattened flight rows into enriched records
pub trait Enricher {
    fn enrich(&self, flight: &FlightRecord) -> std::result::Result<EnrichedRecord, RowError>;

    /// Enrich every row in input order. Row failures are reported with their index.
    fn enrich_batch(&self, flights: &[FlightRecord]) -> Result<EnrichmentOutcome>;
}

/// Result of enriching one batch
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutcome {
    pub records: Vec<EnrichedRecord>,
    pub stats: EnrichmentStats,
}

/// Counters for a batch, keyed by resolution tier/source name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentStats {
    pub total_rows: usize,
    pub enriched_rows: usize,
    pub skipped_rows: usize,
    pub capacity_tiers: BTreeMap<&'static str, usize>,
    pub load_factor_sources: BTreeMap<&'static str, usize>,
    pub total_estimated_passengers: f64,
}

/// Estimates passengers per flight from the capacity reference tables.
pub struct FlightEnricher {
    tables: CapacityTables,
    policy: RowFailurePolicy,
}

impl FlightEnricher {
    pub fn new(tables: CapacityTables) -> Self {
        Self {
            tables,
            policy: RowFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RowFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tables(&self) -> &CapacityTables {
        &self.tables
    }

    pub fn policy(&self) -> RowFailurePolicy {
        self.policy
    }

    fn enrich_with_provenance(
        &self,
        flight: &FlightRecord,
    ) -> std::result::Result<(EnrichedRecord, CapacityTier, LoadFactorSource), RowError> {
        let airline = resolve_airline(flight)?;
        let capacity = resolve_capacity(&airline, flight, &self.tables);
        let load_factor = resolve_load_factor(flight.service_type(), &airline, &self.tables);

        let record = EnrichedRecord::new(flight.clone(), airline, capacity.capacity, load_factor.plf);
        Ok((record, capacity.tier, load_factor.source))
    }
}

impl Enricher for FlightEnricher {
    fn enrich(&self, flight: &FlightRecord) -> std::result::Result<EnrichedRecord, RowError> {
        self.enrich_with_provenance(flight).map(|(record, _, _)| record)
    }

    /// Enrich every row in input order, honoring the row-failure policy.
    #[instrument(skip(self, flights), fields(rows = flights.len(), policy = ?self.policy))]
    fn enrich_batch(&self, flights: &[FlightRecord]) -> Result<EnrichmentOutcome> {
        let mut outcome = EnrichmentOutcome {
            records: Vec::with_capacity(flights.len()),
            stats: EnrichmentStats {
                total_rows: flights.len(),
                ..Default::default()
            },
        };

        for (index, flight) in flights.iter().enumerate() {
            match self.enrich_with_provenance(flight) {
                Ok((record, tier, source)) => {
                    debug!(
                        row = index,
                        airline = %record.airline,
                        capacity_tier = tier.as_str(),
                        plf_source = source.as_str(),
                        "Enriched flight"
                    );
                    metrics::enrich::row_enriched(tier.as_str(), source.as_str());
                    let stats = &mut outcome.stats;
                    stats.enriched_rows += 1;
                    *stats.capacity_tiers.entry(tier.as_str()).or_default() += 1;
                    *stats.load_factor_sources.entry(source.as_str()).or_default() += 1;
                    stats.total_estimated_passengers += record.estimated_passengers;
                    outcome.records.push(record);
                }
                Err(err) => {
                    let error = PipelineError::MalformedRow {
                        index,
                        field: err.field,
                        reason: err.reason,
                    };
                    match self.policy {
                        RowFailurePolicy::FailFast => return Err(error),
                        RowFailurePolicy::SkipAndLog => {
                            warn!("Skipping row: {}", error);
                            metrics::enrich::row_skipped(err.field);
                            outcome.stats.skipped_rows += 1;
                        }
                    }
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::LookupTable;

    fn table(entries: &[(&str, f64)]) -> LookupTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn reference_tables() -> CapacityTables {
        CapacityTables::new(
            table(&[("KL73H", 180.0)]),
            table(&[("73H", 150.0), ("AVG", 120.0)]),
            table(&[("KL", 75.0), ("AVG", 70.0)]),
        )
        .unwrap()
    }

    fn flight(main_flight: Option<&str>, prefix: Option<&str>, service_type: &str) -> FlightRecord {
        FlightRecord {
            main_flight: main_flight.map(String::from),
            prefix_iata: prefix.map(String::from),
            iata_main: Some("73".into()),
            iata_sub: Some("H".into()),
            service_type: Some(service_type.into()),
            destination: Some("JFK".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_scenario() {
        let enricher = FlightEnricher::new(reference_tables());
        let record = enricher.enrich(&flight(Some("KL1234"), Some("KL"), "J")).unwrap();

        assert_eq!(record.airline, "KL");
        assert_eq!(record.capacity, 180.0);
        assert_eq!(record.plf, 0.75);
        assert_eq!(record.estimated_passengers, 135.0);
        assert_eq!(record.flight.destination.as_deref(), Some("JFK"));
    }

    #[test]
    fn test_derived_fields_invariants() {
        let enricher = FlightEnricher::new(reference_tables());
        let flights = vec![
            flight(Some("KL1234"), Some("KL"), "J"),
            flight(Some("HV5001"), None, "J"),
            flight(Some("5Y123"), None, "C"),
            flight(Some("KL9999"), None, "F"),
        ];

        let outcome = enricher.enrich_batch(&flights).unwrap();
        assert_eq!(outcome.records.len(), 4);
        for record in &outcome.records {
            assert_eq!(record.estimated_passengers, record.capacity * record.plf);
            assert!((0.0..=1.0).contains(&record.plf));
            assert!(record.estimated_passengers >= 0.0);
        }
    }

    #[test]
    fn test_fail_fast_reports_row_and_field() {
        let enricher = FlightEnricher::new(reference_tables());
        let flights = vec![flight(Some("KL1234"), None, "J"), flight(None, None, "J")];

        match enricher.enrich_batch(&flights) {
            Err(PipelineError::MalformedRow { index, field, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "mainFlight");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_and_log_drops_bad_rows() {
        let enricher =
            FlightEnricher::new(reference_tables()).with_policy(RowFailurePolicy::SkipAndLog);
        let flights = vec![
            flight(None, None, "J"),
            flight(Some("KL1234"), None, "J"),
            flight(Some(""), None, "C"),
        ];

        let outcome = enricher.enrich_batch(&flights).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.stats.total_rows, 3);
        assert_eq!(outcome.stats.enriched_rows, 1);
        assert_eq!(outcome.stats.skipped_rows, 2);
    }

    #[test]
    fn test_stats_count_tiers_and_sources() {
        let enricher = FlightEnricher::new(reference_tables());
        let mut unknown_aircraft = flight(Some("TO3001"), None, "C");
        unknown_aircraft.iata_main = Some("32".into());
        unknown_aircraft.iata_sub = Some("N".into());
        let flights = vec![
            flight(Some("KL1234"), Some("KL"), "J"),
            flight(Some("HV5001"), None, "J"),
            unknown_aircraft,
        ];

        let stats = enricher.enrich_batch(&flights).unwrap().stats;
        assert_eq!(stats.capacity_tiers.get("airline_aircraft"), Some(&1));
        assert_eq!(stats.capacity_tiers.get("aircraft"), Some(&1));
        assert_eq!(stats.capacity_tiers.get("global_average"), Some(&1));
        assert_eq!(stats.load_factor_sources.get("airline"), Some(&1));
        assert_eq!(stats.load_factor_sources.get("average"), Some(&1));
        assert_eq!(stats.load_factor_sources.get("charter"), Some(&1));
        // 180*0.75 + 150*0.70 + 120*1.0
        assert!((stats.total_estimated_passengers - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_enrichment_is_deterministic() {
        let enricher = FlightEnricher::new(reference_tables());
        let flights = vec![
            flight(Some("KL1234"), Some("KL"), "J"),
            flight(Some("5Y123"), None, "J"),
        ];

        let first = enricher.enrich_batch(&flights).unwrap().records;
        let second = enricher.enrich_batch(&flights).unwrap().records;
        assert_eq!(first, second);
    }
}
