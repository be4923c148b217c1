use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference table '{table}' is missing its '{key}' fallback entry")]
    MissingReferenceData { table: &'static str, key: String },

    #[error("Reference table '{table}' has an invalid value for '{key}': {value}")]
    InvalidReferenceData {
        table: &'static str,
        key: String,
        value: f64,
    },

    #[error("Malformed flight row {index} (field '{field}'): {reason}")]
    MalformedRow {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },
}

impl PipelineError {
    pub fn upstream(message: impl Into<String>) -> Self {
        PipelineError::UpstreamUnavailable {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
