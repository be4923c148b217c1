use async_trait::async_trait;
use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::info;

use crate::app::ports::{OutputPort, WriteReceipt};
use crate::config::OutputConfig;
use crate::constants::{OUTPUT_COLUMNS, OUTPUT_TIMESTAMP_FORMAT};
use crate::domain::EnrichedRecord;
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// Writes the enriched dataset as `{prefix}_{timestamp}.csv` under a directory
pub struct CsvFileOutput {
    dir: PathBuf,
    prefix: String,
}

impl CsvFileOutput {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            dir: config.dir,
            prefix: config.prefix,
        }
    }

    pub fn file_path(&self, run_at: NaiveDateTime) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.csv",
            self.prefix,
            run_at.format(OUTPUT_TIMESTAMP_FORMAT)
        ))
    }
}

/// Renders records as CSV with a header row, in input order.
pub fn render_csv(records: &[EnrichedRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))
}

#[async_trait]
impl OutputPort for CsvFileOutput {
    async fn write_dataset(&self, records: &[EnrichedRecord], run_at: NaiveDateTime) -> Result<WriteReceipt> {
        let bytes = render_csv(records)?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.file_path(run_at);
        tokio::fs::write(&path, &bytes).await?;

        metrics::output::written(records.len(), bytes.len());
        info!("Wrote {} rows to {} (sha256 {})", records.len(), path.display(), sha256);

        Ok(WriteReceipt {
            location: path.display().to_string(),
            rows: records.len(),
            bytes: bytes.len(),
            sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlightRecord;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(main_flight: &str, destination: &str) -> EnrichedRecord {
        let flight = FlightRecord {
            main_flight: Some(main_flight.to_string()),
            destination: Some(destination.to_string()),
            gate: Some("D7, D8".to_string()),
            ..Default::default()
        };
        EnrichedRecord::new(flight, "KL".to_string(), 180.0, 0.75)
    }

    fn run_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 10, 1)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_render_header_and_rows() {
        let bytes = render_csv(&[record("KL1234", "JFK")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), OUTPUT_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("KL1234,,,"));
        assert!(row.contains("\"D7, D8\""));
        assert!(row.ends_with("KL,180.0,0.75,135.0"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_dataset_has_header_only() {
        let text = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_file_name_uses_run_timestamp() {
        let output = CsvFileOutput::new(OutputConfig {
            dir: PathBuf::from("out"),
            prefix: "flight_data".to_string(),
        });
        assert_eq!(
            output.file_path(run_at()),
            PathBuf::from("out/flight_data_2022-10-01_06-30-00.csv")
        );
    }

    #[tokio::test]
    async fn test_rewrite_is_byte_identical() {
        let dir = tempdir().unwrap();
        let output = CsvFileOutput::new(OutputConfig {
            dir: dir.path().join("nested"),
            prefix: "flight_data".to_string(),
        });
        let records = vec![record("KL1234", "JFK"), record("HV5001", "AGP")];

        let first = output.write_dataset(&records, run_at()).await.unwrap();
        let second = output.write_dataset(&records, run_at()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.rows, 2);
        assert_eq!(first.sha256.len(), 64);
        let on_disk = std::fs::read(&first.location).unwrap();
        assert_eq!(on_disk.len(), first.bytes);
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();
        let output = CsvFileOutput::new(OutputConfig {
            dir: blocker.join("output"),
            prefix: "flight_data".to_string(),
        });

        let err = output
            .write_dataset(&[record("KL1234", "JFK")], run_at())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
