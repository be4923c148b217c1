pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reference;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub mod observability;
