//! Table flattening and export for materialized records.
//!
//! Builds long-format polars frames (`unique_id`, `ds`, value column) from
//! timestamped records and writes them as CSV or Parquet.

use crate::config::{ExportConfig, ExportFormat};
use crate::constants::{CSV_DATETIME_FORMAT, ID_COLUMN, TIMESTAMP_COLUMN};
use crate::error::Result;
use crate::materialize::Materialization;
use crate::models::TimedRecord;

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Collect records into a long-format DataFrame
pub fn records_to_frame<I>(records: I, value_column_name: &str) -> Result<DataFrame>
where
    I: IntoIterator<Item = TimedRecord>,
{
    let records = records.into_iter();
    let (lower, _) = records.size_hint();
    collect_frame(records, lower, value_column_name)
}

/// Flatten a materialization, sizing the columns from its record count
pub fn materialization_to_frame(
    materialization: &Materialization<'_>,
    value_column_name: &str,
) -> Result<DataFrame> {
    collect_frame(
        materialization.records(),
        materialization.record_count(),
        value_column_name,
    )
}

fn collect_frame<I>(records: I, capacity: usize, value_column_name: &str) -> Result<DataFrame>
where
    I: Iterator<Item = TimedRecord>,
{
    let mut ids: Vec<String> = Vec::with_capacity(capacity);
    let mut timestamps: Vec<i64> = Vec::with_capacity(capacity);
    let mut values: Vec<f64> = Vec::with_capacity(capacity);

    for record in records {
        ids.push(record.series_id);
        timestamps.push(record.timestamp.and_utc().timestamp_millis());
        values.push(record.value);
    }

    let id_column = Column::new(ID_COLUMN.into(), ids);
    let ds_column = Column::new(TIMESTAMP_COLUMN.into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let value_column = Column::new(value_column_name.into(), values);

    let df = DataFrame::new(vec![id_column, ds_column, value_column])?;
    debug!("Built frame with {} rows", df.height());
    Ok(df)
}

/// Write a frame to `path` in the configured format, returning rows written
pub fn write_frame(df: &mut DataFrame, path: &Path, config: &ExportConfig) -> Result<usize> {
    let mut file = File::create(path)?;

    match config.format {
        ExportFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
                .finish(df)?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(config.compression.to_polars_compression())
                .finish(df)?;
        }
    }

    debug!(
        "Wrote {} rows to {} as {:?}",
        df.height(),
        path.display(),
        config.format
    );
    Ok(df.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionAlgorithm;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(id: &str, day: u32, value: f64) -> TimedRecord {
        TimedRecord {
            series_id: id.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2020, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            value,
        }
    }

    #[test]
    fn test_records_to_frame_columns() {
        let records = vec![record("A", 1, 1.5), record("A", 2, f64::NAN), record("B", 1, 3.0)];
        let df = records_to_frame(records, "series_value").unwrap();

        assert_eq!(df.height(), 3);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["unique_id", "ds", "series_value"]);
        assert_eq!(
            df.column("ds").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
    }

    #[test]
    fn test_materialization_to_frame() {
        let content = "@attribute series_name string\n\
                       @attribute start_timestamp date\n\
                       @frequency monthly\n\
                       @data\n\
                       A:2020-01-01 00-00-00:1,2,3\n\
                       B:2020-06-01 00-00-00:4,?\n";
        let dataset = crate::tsf::decode_str(content, &crate::config::DecodeConfig::default()).unwrap();
        let materialization = crate::materialize::materialize(&dataset).unwrap();

        let df = materialization_to_frame(&materialization, "y").unwrap();
        assert_eq!(df.height(), materialization.record_count());
        assert_eq!(df.height(), 5);
        assert_eq!(df.column("y").unwrap().null_count(), 0);
    }

    #[test]
    fn test_empty_frame() {
        let df = records_to_frame(Vec::new(), "y").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_write_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        let mut df = records_to_frame(vec![record("A", 1, 1.5), record("A", 2, 2.0)], "y").unwrap();

        let rows = write_frame(&mut df, &path, &ExportConfig::default()).unwrap();
        assert_eq!(rows, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("unique_id,ds,y"));
        assert_eq!(lines.next(), Some("A,2020-01-01 00:00:00,1.5"));
        assert!(lines.next().unwrap().starts_with("A,2020-01-02 00:00:00,2"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_parquet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.parquet");
        let mut df = records_to_frame(vec![record("A", 1, 1.5)], "y").unwrap();

        let config = ExportConfig::default()
            .with_format(ExportFormat::Parquet)
            .with_compression(CompressionAlgorithm::Zstd);
        write_frame(&mut df, &path, &config).unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
