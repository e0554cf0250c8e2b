//! Decoder for the tsf time series serialization format
//!
//! A tsf stream is a header of `@` declarations followed by a `@data` tag
//! and one series per line:
//!
//! ```text
//! # M1 yearly subset
//! @attribute series_name string
//! @attribute start_timestamp date
//! @frequency yearly
//! @horizon 6
//! @missing false
//! @equallength false
//! @data
//! T1:1979-01-01 00-00-00:10,20,?,40
//! ```
//!
//! ## Architecture
//!
//! - [`line`] - Classification of individual lines
//! - [`metadata`] - Schema and scalar metadata accumulation
//! - [`series`] - Data row splitting and value coercion
//! - [`decoder`] - State machine sequencing the above
//! - [`stats`] - Line and value counters
//!
//! ## Usage
//!
//! ```rust
//! use tsf_processor::config::DecodeConfig;
//! use tsf_processor::tsf::decode_str;
//!
//! let content = "@attribute series_name string\n@data\nT1:1,2,3\n";
//! let dataset = decode_str(content, &DecodeConfig::default()).unwrap();
//! assert_eq!(dataset.series.len(), 1);
//! assert_eq!(dataset.series[0].values, vec![1.0, 2.0, 3.0]);
//! ```

pub mod decoder;
pub mod line;
pub mod metadata;
pub mod series;
pub mod stats;

#[cfg(test)]
mod tests;

pub use decoder::{DecoderState, TsfDecoder, decode, decode_str};
pub use line::{LineKind, classify};
pub use metadata::MetadataAccumulator;
pub use series::{DecodedRow, decode_series_row};
pub use stats::DecodeStats;
