//! Configuration for decoding, materialization and export.
//!
//! All settings are caller-owned and passed explicitly; nothing in the
//! decoder reads process-wide state.

use crate::constants::{DEFAULT_ID_ATTRIBUTE, DEFAULT_START_ATTRIBUTE, DEFAULT_VALUE_COLUMN};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settings consumed by the tsf decoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Value substituted for `?` tokens in series payloads
    pub missing_value: f64,

    /// Name of the value column when the dataset is flattened into a table.
    /// Not used by the decoder itself.
    pub value_column_name: String,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            missing_value: f64::NAN,
            value_column_name: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

impl DecodeConfig {
    /// Use a custom missing value sentinel
    pub fn with_missing_value(mut self, missing_value: f64) -> Self {
        self.missing_value = missing_value;
        self
    }

    /// Use a custom value column name
    pub fn with_value_column_name(mut self, name: impl Into<String>) -> Self {
        self.value_column_name = name.into();
        self
    }

    /// Whether a decoded value is the missing sentinel (NaN-aware)
    pub fn is_missing(&self, value: f64) -> bool {
        if self.missing_value.is_nan() {
            value.is_nan()
        } else {
            value == self.missing_value
        }
    }
}

/// Settings consumed by the timestamp materializer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeConfig {
    /// Attribute whose value identifies each series
    pub id_attribute: String,

    /// Date attribute holding the first timestamp of each series
    pub start_attribute: String,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            start_attribute: DEFAULT_START_ATTRIBUTE.to_string(),
        }
    }
}

impl MaterializeConfig {
    pub fn with_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id_attribute = name.into();
        self
    }

    pub fn with_start_attribute(mut self, name: impl Into<String>) -> Self {
        self.start_attribute = name.into();
        self
    }
}

/// Output table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(format!(
                "unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                other
            )),
        }
    }
}

/// Settings for writing flattened tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub compression: CompressionAlgorithm,
    /// Recreate existing dataset directories instead of refusing to write
    pub force: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            compression: CompressionAlgorithm::Snappy,
            force: false,
        }
    }
}

impl ExportConfig {
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_force(mut self) -> Self {
        self.force = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_config_defaults() {
        let config = DecodeConfig::default();
        assert!(config.missing_value.is_nan());
        assert_eq!(config.value_column_name, "series_value");
        assert!(config.is_missing(f64::NAN));
        assert!(!config.is_missing(0.0));
    }

    #[test]
    fn test_custom_missing_value() {
        let config = DecodeConfig::default().with_missing_value(-999.0);
        assert!(config.is_missing(-999.0));
        assert!(!config.is_missing(f64::NAN));
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!(
            "ZSTD".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Zstd
        );
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("brotli".parse::<CompressionAlgorithm>().is_err());
    }
}
