use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::EnrichedRecord;
use crate::error::Result;
use crate::pipeline::processing::normalize::RawFlight;
use crate::reference::CapacityTables;

// Extraction-side ports
#[async_trait]
pub trait FlightSourcePort: Send + Sync {
    /// All operated (non-codeshare) flights scheduled on `date`, in source order.
    async fn fetch_flights(&self, date: NaiveDate) -> Result<Vec<RawFlight>>;
}

#[async_trait]
pub trait CapacitySourcePort: Send + Sync {
    async fn load_capacity(&self) -> Result<CapacityTables>;
}

// Load-side ports
#[async_trait]
pub trait OutputPort: Send + Sync {
    /// Persist the enriched dataset for the run started at `run_at`.
    async fn write_dataset(&self, records: &[EnrichedRecord], run_at: NaiveDateTime) -> Result<WriteReceipt>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WriteReceipt {
    pub location: String,
    pub rows: usize,
    pub bytes: usize,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
}
