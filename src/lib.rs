//! tsf Processor Library
//!
//! Decodes forecasting archives in the tsf text format (a header of
//! `@attribute` and scalar `@` declarations, then one series per line after
//! `@data`) and turns them into long-format timestamped tables.
//!
//! This library provides tools for:
//! - Decoding tsf documents into typed datasets with a streaming state machine
//! - Materializing per-observation timestamps from each series start and the
//!   dataset frequency
//! - Flattening records into polars frames and writing CSV or Parquet files
//! - Batch conversion of whole directories with per-file error isolation

pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod materialize;
pub mod models;
pub mod processor;
pub mod tsf;

pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use config::{DecodeConfig, ExportConfig, MaterializeConfig};
pub use error::{DecodeError, MaterializeError, Result, TsfError};
pub use materialize::{Materialization, materialize};
pub use models::{Dataset, DatasetMeta, Series, TimedRecord};
pub use tsf::{decode, decode_str};
