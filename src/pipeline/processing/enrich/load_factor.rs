use crate::constants::AVG_KEY;
use crate::domain::ServiceType;
use crate::reference::CapacityTables;

/// Where a flight's passenger load factor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadFactorSource {
    /// Carrier-specific entry in the plf table
    Airline,
    /// The plf table's `"AVG"` entry
    Average,
    /// Charters are modeled as fully booked
    Charter,
    /// Cargo, positioning and other non-passenger movements
    NonPassenger,
}

/// Lookup order for scheduled services
pub const SCHEDULED_PLF_CASCADE: [LoadFactorSource; 2] =
    [LoadFactorSource::Airline, LoadFactorSource::Average];

impl LoadFactorSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadFactorSource::Airline => "airline",
            LoadFactorSource::Average => "average",
            LoadFactorSource::Charter => "charter",
            LoadFactorSource::NonPassenger => "non_passenger",
        }
    }

    /// Table percentage for the table-backed sources
    fn lookup_percent(self, airline: &str, tables: &CapacityTables) -> Option<f64> {
        match self {
            LoadFactorSource::Airline => tables.plf().get(airline).copied(),
            LoadFactorSource::Average => tables.plf().get(AVG_KEY).copied(),
            LoadFactorSource::Charter | LoadFactorSource::NonPassenger => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadFactorResolution {
    /// Fraction in `[0, 1]`
    pub plf: f64,
    pub source: LoadFactorSource,
}

/// Passenger load factor as a fraction, by service type.
pub fn resolve_load_factor(
    service_type: ServiceType,
    airline: &str,
    tables: &CapacityTables,
) -> LoadFactorResolution {
    match service_type {
        ServiceType::Scheduled => SCHEDULED_PLF_CASCADE
            .iter()
            .find_map(|&source| {
                source
                    .lookup_percent(airline, tables)
                    .map(|percent| LoadFactorResolution {
                        plf: percent / 100.0,
                        source,
                    })
            })
            .unwrap_or_else(|| LoadFactorResolution {
                plf: tables.average_plf() / 100.0,
                source: LoadFactorSource::Average,
            }),
        ServiceType::Charter => LoadFactorResolution {
            plf: 1.0,
            source: LoadFactorSource::Charter,
        },
        ServiceType::Other => LoadFactorResolution {
            plf: 0.0,
            source: LoadFactorSource::NonPassenger,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::LookupTable;

    fn tables(plf: &[(&str, f64)]) -> CapacityTables {
        let aircraft: LookupTable = [("AVG".to_string(), 120.0)].into_iter().collect();
        let plf: LookupTable = plf.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        CapacityTables::new(LookupTable::new(), aircraft, plf).unwrap()
    }

    #[test]
    fn test_scheduled_known_airline() {
        let resolution = resolve_load_factor(
            ServiceType::Scheduled,
            "KL",
            &tables(&[("KL", 80.0), ("AVG", 70.0)]),
        );
        assert!((resolution.plf - 0.8).abs() < 1e-12);
        assert_eq!(resolution.source, LoadFactorSource::Airline);
    }

    #[test]
    fn test_scheduled_unknown_airline_uses_average() {
        let resolution = resolve_load_factor(
            ServiceType::Scheduled,
            "ZZ",
            &tables(&[("KL", 80.0), ("AVG", 70.0)]),
        );
        assert_eq!(resolution.plf, 70.0 / 100.0);
        assert_eq!(resolution.source, LoadFactorSource::Average);
    }

    #[test]
    fn test_charter_is_always_full() {
        for table in [&[("AVG", 0.0)][..], &[("KL", 20.0), ("AVG", 55.0)][..]] {
            let resolution = resolve_load_factor(ServiceType::Charter, "KL", &tables(table));
            assert_eq!(resolution.plf, 1.0);
            assert_eq!(resolution.source, LoadFactorSource::Charter);
        }
    }

    #[test]
    fn test_other_service_types_carry_no_passengers() {
        let resolution = resolve_load_factor(
            ServiceType::from_code(Some("F")),
            "KL",
            &tables(&[("KL", 80.0), ("AVG", 70.0)]),
        );
        assert_eq!(resolution.plf, 0.0);
        assert_eq!(resolution.source, LoadFactorSource::NonPassenger);
    }

    #[test]
    fn test_scheduled_cascade_order() {
        assert_eq!(
            SCHEDULED_PLF_CASCADE,
            [LoadFactorSource::Airline, LoadFactorSource::Average]
        );
    }
}
