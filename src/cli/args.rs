//! Command-line argument definitions for the tsf processor

use crate::config::{
    CompressionAlgorithm, DecodeConfig, ExportConfig, ExportFormat, MaterializeConfig,
};
use crate::constants::{DEFAULT_ID_ATTRIBUTE, DEFAULT_START_ATTRIBUTE, DEFAULT_VALUE_COLUMN};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tsf processor
///
/// Converts forecasting archives in the tsf text format into long-format
/// tables (one row per series, timestamp and value).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tsf-processor",
    version,
    about = "Convert tsf forecasting datasets into long-format CSV or Parquet tables"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode tsf files and write one long-format table per dataset
    Convert(ConvertArgs),
    /// Decode a tsf file and print its metadata without writing anything
    Inspect(InspectArgs),
}

/// Output table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Parquet => ExportFormat::Parquet,
        }
    }
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// A tsf file, or a directory containing tsf files
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Root directory for the generated tables
    ///
    /// Each dataset is written to `<OUTPUT>/<name>/<name>.<ext>`. Defaults to ./data
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Output table format
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long = "compression", default_value = "snappy")]
    pub compression: CompressionAlgorithm,

    /// Value stored for `?` tokens (defaults to NaN)
    #[arg(long = "missing-value", value_name = "VALUE", allow_hyphen_values = true)]
    pub missing_value: Option<f64>,

    /// Name of the value column in the output table
    #[arg(long = "value-column", value_name = "NAME", default_value = DEFAULT_VALUE_COLUMN)]
    pub value_column: String,

    /// Attribute holding the series identifier
    #[arg(long = "id-attribute", value_name = "NAME", default_value = DEFAULT_ID_ATTRIBUTE)]
    pub id_attribute: String,

    /// Attribute holding the series start timestamp
    #[arg(long = "start-attribute", value_name = "NAME", default_value = DEFAULT_START_ATTRIBUTE)]
    pub start_attribute: String,

    /// Recreate dataset directories that already exist
    #[arg(long = "force")]
    pub force: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// The tsf file to inspect
    #[arg(value_name = "FILE")]
    pub input_path: PathBuf,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Map quiet/verbose flags to a tracing level name
pub fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl ConvertArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Show progress bars unless running quietly
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    pub fn decode_config(&self) -> DecodeConfig {
        let config = DecodeConfig::default().with_value_column_name(self.value_column.clone());
        match self.missing_value {
            Some(value) => config.with_missing_value(value),
            None => config,
        }
    }

    pub fn materialize_config(&self) -> MaterializeConfig {
        MaterializeConfig::default()
            .with_id_attribute(self.id_attribute.clone())
            .with_start_attribute(self.start_attribute.clone())
    }

    pub fn export_config(&self) -> ExportConfig {
        let config = ExportConfig::default()
            .with_format(self.format.into())
            .with_compression(self.compression);
        if self.force { config.with_force() } else { config }
    }
}

impl InspectArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(false, self.verbose)
    }
}
