/// Reference data and API constants shared across the pipeline stages

// Sentinel key every queried reference table must carry
pub const AVG_KEY: &str = "AVG";

// Service type codes as published by the flights API
pub const SERVICE_TYPE_SCHEDULED: &str = "J";
pub const SERVICE_TYPE_CHARTER: &str = "C";

// Reference table names (used in error messages and logs)
pub const AIRLINE_CAP_TABLE: &str = "airline_cap";
pub const AIRCRAFT_CAP_TABLE: &str = "aircraft_cap";
pub const PLF_TABLE: &str = "plf";

// Default reference file names
pub const AIRLINE_CAPACITY_FILE: &str = "airline_capacity.csv";
pub const AIRCRAFT_CAPACITY_FILE: &str = "aircraft_capacity.csv";
pub const PASSENGER_LOAD_FACTOR_FILE: &str = "passenger_load_factor.csv";

// Flights API
pub const DEFAULT_API_BASE_URL: &str = "https://api.schiphol.nl/public-flights";
pub const DEFAULT_RESOURCE_VERSION: &str = "v4";
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;
pub const APP_ID_ENV: &str = "SCHIPHOL_APP_ID";
pub const APP_KEY_ENV: &str = "SCHIPHOL_APP_KEY";

// Output dataset
pub const DEFAULT_OUTPUT_PREFIX: &str = "flight_data";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Columns of the output dataset, in the order they are written
pub const OUTPUT_COLUMNS: [&str; 19] = [
    "mainFlight",
    "prefixIATA",
    "flightNumber",
    "iataMain",
    "iataSub",
    "serviceType",
    "flightDirection",
    "destination",
    "terminal",
    "pier",
    "gate",
    "scheduleDateTime",
    "estimatedLandingTime",
    "actualLandingTime",
    "lastUpdatedAt",
    "airline",
    "capacity",
    "plf",
    "estimatedPassengers",
];
