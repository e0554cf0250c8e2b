//! Application constants for the tsf processor
//!
//! This module contains the format tokens, default values and output
//! conventions used throughout the tsf processor.

// =============================================================================
// tsf Format Tokens
// =============================================================================

/// Prefix shared by every metadata declaration line
pub const METADATA_PREFIX: char = '@';

/// Prefix of comment lines
pub const COMMENT_PREFIX: char = '#';

/// Tag that opens the data section
pub const DATA_TAG: &str = "@data";

/// Tag that declares one attribute of the schema
pub const ATTRIBUTE_TAG: &str = "@attribute";

/// Separator between attribute values and the numeric payload of a row
pub const FIELD_SEPARATOR: char = ':';

/// Separator between numeric values of a series payload
pub const VALUE_SEPARATOR: char = ',';

/// Token marking a missing observation in a series payload
pub const MISSING_TOKEN: &str = "?";

/// Fixed pattern for `date` attributes (e.g. `1979-01-01 00-00-00`)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Scalar metadata keys understood by the decoder
pub mod meta_keys {
    pub const FREQUENCY: &str = "frequency";
    pub const HORIZON: &str = "horizon";
    pub const MISSING: &str = "missing";
    pub const EQUAL_LENGTH: &str = "equallength";
}

/// Attribute type tokens
pub mod attribute_types {
    pub const NUMERIC: &str = "numeric";
    pub const STRING: &str = "string";
    pub const DATE: &str = "date";
}

/// Tokens accepted as `true` in boolean metadata (case-insensitive)
pub const TRUTHY_TOKENS: &[&str] = &["y", "yes", "t", "true", "on", "1"];

/// Tokens accepted as `false` in boolean metadata (case-insensitive)
pub const FALSY_TOKENS: &[&str] = &["n", "no", "f", "false", "off", "0"];

// =============================================================================
// Defaults
// =============================================================================

/// Name of the value column when a dataset is flattened into a table
pub const DEFAULT_VALUE_COLUMN: &str = "series_value";

/// Attribute holding the identifier of each series
pub const DEFAULT_ID_ATTRIBUTE: &str = "series_name";

/// Attribute holding the first timestamp of each series
pub const DEFAULT_START_ATTRIBUTE: &str = "start_timestamp";

// =============================================================================
// Output Layout
// =============================================================================

/// File extension of tsf inputs
pub const TSF_EXTENSION: &str = "tsf";

/// Column holding the series identifier in long-format output
pub const ID_COLUMN: &str = "unique_id";

/// Column holding the timestamp in long-format output
pub const TIMESTAMP_COLUMN: &str = "ds";

/// Datetime rendering used in CSV output
pub const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default output directory when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "data";
