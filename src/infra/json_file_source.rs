use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::app::ports::FlightSourcePort;
use crate::error::{PipelineError, Result};
use crate::pipeline::processing::normalize::{select_operated_flights, RawFlight};

/// Flight source backed by a saved extraction: a JSON array of raw flights or
/// an API page (`{"flights": [...]}`). Codeshare duplicates are dropped on read.
pub struct JsonFileFlightSource {
    path: PathBuf,
}

impl JsonFileFlightSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Accepts either a bare array or an object with a `flights` array and keeps
/// only the operated flights.
pub fn flights_from_json(value: Value) -> Result<Vec<RawFlight>> {
    match value {
        Value::Array(flights) => Ok(select_operated_flights(flights)),
        Value::Object(mut map) => match map.remove("flights") {
            Some(Value::Array(flights)) => Ok(select_operated_flights(flights)),
            _ => Err(PipelineError::Config(
                "expected a 'flights' array in the flight file".to_string(),
            )),
        },
        _ => Err(PipelineError::Config(
            "flight file must contain a JSON array or object".to_string(),
        )),
    }
}

#[async_trait]
impl FlightSourcePort for JsonFileFlightSource {
    async fn fetch_flights(&self, date: NaiveDate) -> Result<Vec<RawFlight>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read flight file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        let flights = flights_from_json(serde_json::from_str(&content)?)?;
        if flights.is_empty() {
            warn!("Flight file {} is empty", self.path.display());
        }
        info!("Read {} flights for {} from {}", flights.len(), date, self.path.display());
        Ok(flights)
    }
}
