//! Error handling for tsf decoding, materialization and export.
//!
//! The decoder is fail-fast: every [`DecodeError`] is terminal for the
//! current stream and carries the 1-based line number where decoding stopped.
//! The materializer only fails as a whole on [`MaterializeError`]; per-series
//! problems are reported as diagnostics instead (see
//! [`crate::materialize::SeriesIssue`]).

use std::path::PathBuf;
use thiserror::Error;

/// Terminal errors raised while decoding a tsf stream
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("Missing attribute section at line {line}: attribute section must come before data")]
    MissingAttributeSection { line: usize },

    #[error("Invalid meta-data specification at line {line}: {reason}")]
    InvalidMetadataSpec { line: usize, reason: String },

    #[error("Unsupported type '{type_name}' for attribute '{attribute}' at line {line}")]
    UnsupportedAttributeType {
        line: usize,
        attribute: String,
        type_name: String,
    },

    #[error("Invalid @horizon value '{value}' at line {line}")]
    InvalidHorizonValue { line: usize, value: String },

    #[error("Invalid boolean value '{value}' for @{key} at line {line}")]
    InvalidBooleanValue {
        line: usize,
        key: String,
        value: String,
    },

    #[error("Missing @data tag before series at line {line}")]
    MissingDataTag { line: usize },

    #[error("Missing series information under data section (line {line})")]
    MissingDataSection { line: usize },

    #[error("Missing attributes/values in series at line {line}: expected {expected} fields, found {found}")]
    MalformedSeriesRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Series at line {line} has no values; missing values must be written as '?'")]
    EmptySeriesPayload { line: usize },

    #[error("Invalid numeric value '{token}' at line {line}")]
    InvalidNumericValue { line: usize, token: String },

    #[error("All series values are missing at line {line}")]
    AllValuesMissing { line: usize },

    #[error("Invalid value '{value}' for attribute '{attribute}' at line {line}")]
    InvalidAttributeValue {
        line: usize,
        attribute: String,
        value: String,
    },
}

impl DecodeError {
    /// Line number the error was raised at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            DecodeError::EmptyFile => None,
            DecodeError::Io { line, .. }
            | DecodeError::MissingAttributeSection { line }
            | DecodeError::InvalidMetadataSpec { line, .. }
            | DecodeError::UnsupportedAttributeType { line, .. }
            | DecodeError::InvalidHorizonValue { line, .. }
            | DecodeError::InvalidBooleanValue { line, .. }
            | DecodeError::MissingDataTag { line }
            | DecodeError::MissingDataSection { line }
            | DecodeError::MalformedSeriesRow { line, .. }
            | DecodeError::EmptySeriesPayload { line }
            | DecodeError::InvalidNumericValue { line, .. }
            | DecodeError::AllValuesMissing { line }
            | DecodeError::InvalidAttributeValue { line, .. } => Some(*line),
        }
    }
}

/// Errors that abort a whole materialization call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    #[error("Unsupported frequency: {}", .frequency.as_deref().unwrap_or("<not declared>"))]
    UnsupportedFrequency { frequency: Option<String> },
}

/// Errors raised by the file-level processing layer
#[derive(Error, Debug)]
pub enum TsfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Materialization failed: {0}")]
    Materialize(#[from] MaterializeError),

    #[error("No .tsf files found at path: {path}")]
    NoInputFiles { path: PathBuf },

    #[error("Input path does not exist: {path}")]
    InvalidInputPath { path: PathBuf },

    #[error("Output already exists (use --force to overwrite): {path}")]
    OutputExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TsfError {
    /// Line of the input file where decoding stopped, for decode failures
    pub fn line(&self) -> Option<usize> {
        match self {
            TsfError::Decode { source, .. } => source.line(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TsfError>;
