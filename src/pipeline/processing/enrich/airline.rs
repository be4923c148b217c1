use crate::domain::FlightRecord;

/// Why a carrier code could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirlineError {
    MissingMainFlight,
}

/// Best-known carrier code for a flight row.
///
/// First match wins:
/// 1. the published `prefixIATA`;
/// 2. the letters of `mainFlight` when it has exactly two of them (`KL1234` → `KL`);
/// 3. the first two characters of `mainFlight` verbatim (`5Y123` → `5Y`).
pub fn resolve_airline(flight: &FlightRecord) -> Result<String, AirlineError> {
    if let Some(prefix) = flight.prefix_iata.as_deref().filter(|p| !p.is_empty()) {
        return Ok(prefix.to_string());
    }

    let main_flight = flight
        .main_flight
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or(AirlineError::MissingMainFlight)?;

    let letters: String = main_flight.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.chars().count() == 2 {
        Ok(letters)
    } else {
        Ok(main_flight.chars().take(2).collect())
    }
}
