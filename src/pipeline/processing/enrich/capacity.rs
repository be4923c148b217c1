use crate::constants::AVG_KEY;
use crate::domain::FlightRecord;
use crate::reference::CapacityTables;

/// One level of the seat-capacity lookup, from most to least specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityTier {
    /// `airline + iataMain + iataSub` in the airline table
    AirlineAircraft,
    /// `iataMain + iataSub` in the aircraft table
    Aircraft,
    /// `"AVG"` in the aircraft table
    GlobalAverage,
}

/// Lookup order. The first tier that yields a value wins.
pub const CAPACITY_CASCADE: [CapacityTier; 3] = [
    CapacityTier::AirlineAircraft,
    CapacityTier::Aircraft,
    CapacityTier::GlobalAverage,
];

impl CapacityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            CapacityTier::AirlineAircraft => "airline_aircraft",
            CapacityTier::Aircraft => "aircraft",
            CapacityTier::GlobalAverage => "global_average",
        }
    }

    pub fn lookup(self, airline: &str, flight: &FlightRecord, tables: &CapacityTables) -> Option<f64> {
        let iata_main = flight.iata_main.as_deref();
        let iata_sub = flight.iata_sub.as_deref();
        match self {
            CapacityTier::AirlineAircraft => tables
                .airline_cap()
                .get(&combine_codes(&[Some(airline), iata_main, iata_sub]))
                .copied(),
            CapacityTier::Aircraft => tables
                .aircraft_cap()
                .get(&combine_codes(&[iata_main, iata_sub]))
                .copied(),
            CapacityTier::GlobalAverage => tables.aircraft_cap().get(AVG_KEY).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityResolution {
    pub capacity: f64,
    pub tier: CapacityTier,
}

/// Seat capacity for a flight operated by `airline`.
pub fn resolve_capacity(airline: &str, flight: &FlightRecord, tables: &CapacityTables) -> CapacityResolution {
    CAPACITY_CASCADE
        .iter()
        .find_map(|&tier| {
            tier.lookup(airline, flight, tables)
                .map(|capacity| CapacityResolution { capacity, tier })
        })
        // Validated tables always carry "AVG"
        .unwrap_or_else(|| CapacityResolution {
            capacity: tables.average_capacity(),
            tier: CapacityTier::GlobalAverage,
        })
}

/// Concatenates the present, non-empty codes in order.
pub fn combine_codes(parts: &[Option<&str>]) -> String {
    parts.iter().flatten().filter(|p| !p.is_empty()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::LookupTable;

    fn table(entries: &[(&str, f64)]) -> LookupTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn tables() -> CapacityTables {
        CapacityTables::new(
            table(&[("KL73H", 180.0), ("HV73W", 174.0)]),
            table(&[("73H", 150.0), ("73W", 148.0), ("AVG", 120.0)]),
            table(&[("AVG", 70.0)]),
        )
        .unwrap()
    }

    fn aircraft(main: Option<&str>, sub: Option<&str>) -> FlightRecord {
        FlightRecord {
            iata_main: main.map(String::from),
            iata_sub: sub.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(
            CAPACITY_CASCADE,
            [CapacityTier::AirlineAircraft, CapacityTier::Aircraft, CapacityTier::GlobalAverage]
        );
    }

    #[test]
    fn test_airline_specific_beats_aircraft() {
        let resolution = resolve_capacity("KL", &aircraft(Some("73"), Some("H")), &tables());
        assert_eq!(resolution.capacity, 180.0);
        assert_eq!(resolution.tier, CapacityTier::AirlineAircraft);
    }

    #[test]
    fn test_aircraft_beats_average() {
        let resolution = resolve_capacity("TO", &aircraft(Some("73"), Some("H")), &tables());
        assert_eq!(resolution.capacity, 150.0);
        assert_eq!(resolution.tier, CapacityTier::Aircraft);
    }

    #[test]
    fn test_unknown_aircraft_uses_average() {
        let resolution = resolve_capacity("KL", &aircraft(Some("32"), Some("N")), &tables());
        assert_eq!(resolution.capacity, 120.0);
        assert_eq!(resolution.tier, CapacityTier::GlobalAverage);
    }

    #[test]
    fn test_missing_sub_type_is_skipped_in_keys() {
        // "73W" without a sub type still matches both key shapes
        let resolution = resolve_capacity("HV", &aircraft(Some("73W"), None), &tables());
        assert_eq!(resolution.capacity, 174.0);

        let resolution = resolve_capacity("XX", &aircraft(Some("73W"), None), &tables());
        assert_eq!(resolution.capacity, 148.0);
    }

    #[test]
    fn test_missing_aircraft_type_uses_average() {
        let resolution = resolve_capacity("KL", &aircraft(None, None), &tables());
        assert_eq!(resolution.tier, CapacityTier::GlobalAverage);
        assert_eq!(resolution.capacity, 120.0);
    }

    #[test]
    fn test_no_partial_matching() {
        // "73" alone is not a prefix match for "73H"
        let resolution = resolve_capacity("TO", &aircraft(Some("73"), None), &tables());
        assert_eq!(resolution.tier, CapacityTier::GlobalAverage);
    }

    #[test]
    fn test_combine_codes() {
        assert_eq!(combine_codes(&[Some("KL"), Some("73"), Some("H")]), "KL73H");
        assert_eq!(combine_codes(&[Some("KL"), None, Some("H")]), "KLH");
        assert_eq!(combine_codes(&[None, Some(""), None]), "");
    }
}
