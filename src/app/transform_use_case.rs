use std::time::Instant;
use tracing::info;

use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::enrich::{EnrichmentOutcome, Enricher};
use crate::pipeline::processing::normalize::{FlightNormalizer, Normalizer, RawFlight};

/// Use case for the transform stage: normalize, enrich, collect
pub struct TransformUseCase {
    normalizer: Box<dyn Normalizer + Send + Sync>,
    enricher: Box<dyn Enricher + Send + Sync>,
}

impl TransformUseCase {
    pub fn new(
        normalizer: Box<dyn Normalizer + Send + Sync>,
        enricher: Box<dyn Enricher + Send + Sync>,
    ) -> Self {
        Self {
            normalizer,
            enricher,
        }
    }

    /// Create a use case with the default flight normalizer
    pub fn with_default_normalizer(enricher: impl Enricher + Send + Sync + 'static) -> Self {
        Self::new(Box::new(FlightNormalizer::new()), Box::new(enricher))
    }

    pub fn transform(&self, raw_flights: &[RawFlight]) -> Result<EnrichmentOutcome> {
        let started = Instant::now();

        let flights = self.normalizer.normalize_all(raw_flights);
        let outcome = self.enricher.enrich_batch(&flights)?;

        metrics::enrich::batch_processed(raw_flights.len(), started.elapsed().as_secs_f64());
        info!(
            "Transformed {} flights ({} enriched, {} skipped, {:.0} estimated passengers)",
            outcome.stats.total_rows,
            outcome.stats.enriched_rows,
            outcome.stats.skipped_rows,
            outcome.stats.total_estimated_passengers
        );

        Ok(outcome)
    }
}
