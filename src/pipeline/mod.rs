pub mod processing;
pub mod run;

pub use run::{Pipeline, RunSummary};
