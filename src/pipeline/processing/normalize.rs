use serde_json::Value;
use tracing::debug;

use crate::domain::FlightRecord;

/// Raw flight payload as returned by the flights API
pub type RawFlight = Value;

/// Drops codeshare duplicates: only the operating record has `mainFlight == flightName`.
///
/// Records missing either identifier, or carrying a non-string one, are dropped too.
pub fn select_operated_flights(flights: Vec<RawFlight>) -> Vec<RawFlight> {
    flights.into_iter().filter(is_operated_flight).collect()
}

fn is_operated_flight(flight: &RawFlight) -> bool {
    let main = flight.get("mainFlight").and_then(Value::as_str);
    let name = flight.get("flightName").and_then(Value::as_str);
    matches!((main, name), (Some(main), Some(name)) if main == name)
}

/// Trait for flattening raw flight payloads into [`FlightRecord`]s
pub trait Normalizer {
    /// Flatten one raw record. Missing or unexpected fields become `None`.
    fn normalize(&self, raw: &RawFlight) -> FlightRecord;

    fn normalize_all(&self, raws: &[RawFlight]) -> Vec<FlightRecord> {
        raws.iter().map(|raw| self.normalize(raw)).collect()
    }
}

/// Normalizer for the public-flights v4 payload shape.
///
/// `aircraftType.iataMain`/`iataSub` are lifted to the top level and only the
/// first entry of `route.destinations` is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlightNormalizer;

impl FlightNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for FlightNormalizer {
    fn normalize(&self, raw: &RawFlight) -> FlightRecord {
        let destination = raw
            .pointer("/route/destinations")
            .and_then(Value::as_array)
            .and_then(|destinations| {
                if destinations.len() > 1 {
                    debug!("Discarding {} later destinations", destinations.len() - 1);
                }
                destinations.first()
            })
            .and_then(as_text);

        FlightRecord {
            main_flight: text_at(raw, "/mainFlight"),
            prefix_iata: text_at(raw, "/prefixIATA"),
            flight_number: raw.get("flightNumber").and_then(as_integer),
            iata_main: text_at(raw, "/aircraftType/iataMain"),
            iata_sub: text_at(raw, "/aircraftType/iataSub"),
            service_type: text_at(raw, "/serviceType"),
            flight_direction: text_at(raw, "/flightDirection"),
            destination,
            terminal: text_at(raw, "/terminal"),
            pier: text_at(raw, "/pier"),
            gate: text_at(raw, "/gate"),
            schedule_date_time: text_at(raw, "/scheduleDateTime"),
            estimated_landing_time: text_at(raw, "/estimatedLandingTime"),
            actual_landing_time: text_at(raw, "/actualLandingTime"),
            last_updated_at: text_at(raw, "/lastUpdatedAt"),
        }
    }
}

fn text_at(raw: &Value, pointer: &str) -> Option<String> {
    raw.pointer(pointer).and_then(as_text)
}

// Strings pass through, numbers are stringified (terminal is numeric in v4)
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
