// Observability: metrics recording

pub mod metrics;
