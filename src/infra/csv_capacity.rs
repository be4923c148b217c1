use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::CapacitySourcePort;
use crate::config::ReferenceConfig;
use crate::error::{PipelineError, Result};
use crate::reference::CapacityTables;

/// Reads the three capacity reference CSVs from a directory
pub struct CsvCapacitySource {
    config: ReferenceConfig,
}

impl CsvCapacitySource {
    pub fn new(config: ReferenceConfig) -> Self {
        Self { config }
    }

    /// Uses the default file names inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(ReferenceConfig {
            dir: dir.into(),
            ..Default::default()
        })
    }

    fn open(&self, file_name: &str) -> Result<File> {
        let path = self.config.dir.join(file_name);
        File::open(&path).map_err(|e| open_error(&path, e))
    }
}

fn open_error(path: &Path, err: std::io::Error) -> PipelineError {
    PipelineError::Config(format!(
        "Failed to open reference table '{}': {}",
        path.display(),
        err
    ))
}

#[async_trait]
impl CapacitySourcePort for CsvCapacitySource {
    async fn load_capacity(&self) -> Result<CapacityTables> {
        let tables = CapacityTables::from_readers(
            self.open(&self.config.airline_capacity_file)?,
            self.open(&self.config.aircraft_capacity_file)?,
            self.open(&self.config.passenger_load_factor_file)?,
        )?;
        info!(
            "Loaded capacity reference from {} ({} airline, {} aircraft, {} plf entries)",
            self.config.dir.display(),
            tables.airline_cap().len(),
            tables.aircraft_cap().len(),
            tables.plf().len()
        );
        Ok(tables)
    }
}
