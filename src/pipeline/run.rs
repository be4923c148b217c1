use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::app::ports::{CapacitySourcePort, FlightSourcePort, OutputPort, WriteReceipt};
use crate::app::transform_use_case::TransformUseCase;
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::enrich::{EnrichmentStats, FlightEnricher, RowFailurePolicy};

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub schedule_date: NaiveDate,
    pub fetched_flights: usize,
    pub stats: EnrichmentStats,
    pub receipt: WriteReceipt,
}

/// Extraction → transform → persistence for one schedule date.
pub struct Pipeline {
    flights: Box<dyn FlightSourcePort>,
    capacity: Box<dyn CapacitySourcePort>,
    output: Box<dyn OutputPort>,
    policy: RowFailurePolicy,
}

impl Pipeline {
    pub fn new(
        flights: Box<dyn FlightSourcePort>,
        capacity: Box<dyn CapacitySourcePort>,
        output: Box<dyn OutputPort>,
    ) -> Self {
        Self {
            flights,
            capacity,
            output,
            policy: RowFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RowFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run once for `date`; `run_at` stamps the output dataset.
    #[instrument(skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn run(&self, date: NaiveDate, run_at: NaiveDateTime) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        match self.run_inner(run_id, date, run_at).await {
            Ok(summary) => {
                metrics::run::succeeded();
                Ok(summary)
            }
            Err(e) => {
                metrics::run::failed();
                error!("Run failed for {}: {}", date, e);
                Err(e)
            }
        }
    }

    async fn run_inner(&self, run_id: Uuid, date: NaiveDate, run_at: NaiveDateTime) -> Result<RunSummary> {
        // Step 1: extract
        info!("Extracting flights scheduled on {}", date);
        let raw_flights = self.flights.fetch_flights(date).await?;
        info!("Extracting capacity reference tables");
        let tables = self.capacity.load_capacity().await?;

        // Step 2: transform
        let use_case = TransformUseCase::with_default_normalizer(
            FlightEnricher::new(tables).with_policy(self.policy),
        );
        let outcome = use_case.transform(&raw_flights)?;

        // Step 3: load
        let receipt = self.output.write_dataset(&outcome.records, run_at).await?;
        info!("Run complete: {} rows written to {}", receipt.rows, receipt.location);

        Ok(RunSummary {
            run_id,
            schedule_date: date,
            fetched_flights: raw_flights.len(),
            stats: outcome.stats,
            receipt,
        })
    }
}
