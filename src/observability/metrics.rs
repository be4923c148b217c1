//! Metric names and per-phase recording helpers.
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use std::fmt;

/// All metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Extraction
    ExtractPagesFetched,
    ExtractFlightsFetched,
    ExtractCodesharesDropped,
    ExtractDuration,

    // Enrichment
    EnrichRowsEnriched,
    EnrichRowsSkipped,
    EnrichBatchSize,
    EnrichDuration,

    // Output
    OutputRowsWritten,
    OutputBytesWritten,

    // Runs
    RunsSuccess,
    RunsError,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ExtractPagesFetched => "flight_loads_extract_pages_fetched_total",
            MetricName::ExtractFlightsFetched => "flight_loads_extract_flights_fetched_total",
            MetricName::ExtractCodesharesDropped => "flight_loads_extract_codeshares_dropped_total",
            MetricName::ExtractDuration => "flight_loads_extract_duration_seconds",

            MetricName::EnrichRowsEnriched => "flight_loads_enrich_rows_enriched_total",
            MetricName::EnrichRowsSkipped => "flight_loads_enrich_rows_skipped_total",
            MetricName::EnrichBatchSize => "flight_loads_enrich_batch_size",
            MetricName::EnrichDuration => "flight_loads_enrich_duration_seconds",

            MetricName::OutputRowsWritten => "flight_loads_output_rows_written_total",
            MetricName::OutputBytesWritten => "flight_loads_output_bytes_written",

            MetricName::RunsSuccess => "flight_loads_runs_success_total",
            MetricName::RunsError => "flight_loads_runs_error_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub mod extract {
    use super::MetricName;

    pub fn page_fetched(flights: usize, codeshares_dropped: usize) {
        ::metrics::counter!(MetricName::ExtractPagesFetched.as_str()).increment(1);
        ::metrics::counter!(MetricName::ExtractFlightsFetched.as_str()).increment(flights as u64);
        ::metrics::counter!(MetricName::ExtractCodesharesDropped.as_str())
            .increment(codeshares_dropped as u64);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::ExtractDuration.as_str()).record(secs);
    }
}

pub mod enrich {
    use super::MetricName;

    pub fn row_enriched(capacity_tier: &'static str, plf_source: &'static str) {
        ::metrics::counter!(
            MetricName::EnrichRowsEnriched.as_str(),
            "capacity_tier" => capacity_tier,
            "plf_source" => plf_source
        )
        .increment(1);
    }

    pub fn row_skipped(field: &'static str) {
        ::metrics::counter!(MetricName::EnrichRowsSkipped.as_str(), "field" => field).increment(1);
    }

    pub fn batch_processed(size: usize, secs: f64) {
        ::metrics::histogram!(MetricName::EnrichBatchSize.as_str()).record(size as f64);
        ::metrics::histogram!(MetricName::EnrichDuration.as_str()).record(secs);
    }
}

pub mod output {
    use super::MetricName;

    pub fn written(rows: usize, bytes: usize) {
        ::metrics::counter!(MetricName::OutputRowsWritten.as_str()).increment(rows as u64);
        ::metrics::histogram!(MetricName::OutputBytesWritten.as_str()).record(bytes as f64);
    }
}

pub mod run {
    use super::MetricName;

    pub fn succeeded() {
        ::metrics::counter!(MetricName::RunsSuccess.as_str()).increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::RunsError.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed_and_unique() {
        let names = [
            MetricName::ExtractPagesFetched,
            MetricName::ExtractFlightsFetched,
            MetricName::ExtractCodesharesDropped,
            MetricName::ExtractDuration,
            MetricName::EnrichRowsEnriched,
            MetricName::EnrichRowsSkipped,
            MetricName::EnrichBatchSize,
            MetricName::EnrichDuration,
            MetricName::OutputRowsWritten,
            MetricName::OutputBytesWritten,
            MetricName::RunsSuccess,
            MetricName::RunsError,
        ];
        let mut seen = std::collections::HashSet::new();
        for name in names {
            assert!(name.as_str().starts_with("flight_loads_"));
            assert!(seen.insert(name.as_str()), "duplicate metric {}", name);
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        enrich::row_enriched("aircraft", "average");
        enrich::row_skipped("mainFlight");
        output::written(3, 120);
        run::succeeded();
    }
}
