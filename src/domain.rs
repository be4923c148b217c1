//! Record shapes flowing through the transform stage.

use serde::{Deserialize, Serialize};

use crate::constants::{SERVICE_TYPE_CHARTER, SERVICE_TYPE_SCHEDULED};

/// One scheduled flight occurrence, flattened from the raw API payload.
///
/// Every field is optional: the source API omits fields freely and the
/// normalizer never rejects a record for a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub main_flight: Option<String>,
    #[serde(rename = "prefixIATA")]
    pub prefix_iata: Option<String>,
    pub flight_number: Option<i64>,
    pub iata_main: Option<String>,
    pub iata_sub: Option<String>,
    pub service_type: Option<String>,
    pub flight_direction: Option<String>,
    /// First destination of the route; later legs are discarded
    pub destination: Option<String>,
    pub terminal: Option<String>,
    pub pier: Option<String>,
    pub gate: Option<String>,
    pub schedule_date_time: Option<String>,
    pub estimated_landing_time: Option<String>,
    pub actual_landing_time: Option<String>,
    pub last_updated_at: Option<String>,
}

impl FlightRecord {
    pub fn service_type(&self) -> ServiceType {
        ServiceType::from_code(self.service_type.as_deref())
    }
}

/// Movement classification that drives the load-factor policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// "J": scheduled passenger service
    Scheduled,
    /// "C": charter, modeled as fully booked
    Charter,
    /// Cargo, positioning and anything else, including a missing code
    Other,
}

impl ServiceType {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(SERVICE_TYPE_SCHEDULED) => ServiceType::Scheduled,
            Some(SERVICE_TYPE_CHARTER) => ServiceType::Charter,
            _ => ServiceType::Other,
        }
    }
}

/// A flight row plus the derived passenger-load estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub flight: FlightRecord,
    /// Resolved carrier code
    pub airline: String,
    /// Seat capacity
    pub capacity: f64,
    /// Passenger load factor as a fraction in `[0, 1]`
    pub plf: f64,
    /// `capacity * plf`
    pub estimated_passengers: f64,
}

impl EnrichedRecord {
    pub fn new(flight: FlightRecord, airline: String, capacity: f64, plf: f64) -> Self {
        Self {
            flight,
            airline,
            capacity,
            plf,
            estimated_passengers: capacity * plf,
        }
    }

    /// Column values in `OUTPUT_COLUMNS` order; absent fields become empty cells.
    pub fn to_row(&self) -> Vec<String> {
        let f = &self.flight;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            text(&f.main_flight),
            text(&f.prefix_iata),
            f.flight_number.map(|n| n.to_string()).unwrap_or_default(),
            text(&f.iata_main),
            text(&f.iata_sub),
            text(&f.service_type),
            text(&f.flight_direction),
            text(&f.destination),
            text(&f.terminal),
            text(&f.pier),
            text(&f.gate),
            text(&f.schedule_date_time),
            text(&f.estimated_landing_time),
            text(&f.actual_landing_time),
            text(&f.last_updated_at),
            self.airline.clone(),
            format_float(self.capacity),
            format_float(self.plf),
            format_float(self.estimated_passengers),
        ]
    }
}

// Debug formatting keeps a trailing ".0" on whole numbers (180.0, not 180)
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
