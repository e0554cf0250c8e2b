//! Core tsf decoder implementation
//!
//! Drives the line classifier, metadata accumulator and series decoder
//! through an explicit state machine. The stream is consumed line by line
//! with no lookahead; the first error aborts decoding and no partial dataset
//! is returned.

use std::io::BufRead;
use tracing::debug;

use super::line::{LineKind, classify};
use super::metadata::MetadataAccumulator;
use super::series::decode_series_row;
use super::stats::DecodeStats;
use crate::config::DecodeConfig;
use crate::error::DecodeError;
use crate::models::{Dataset, Series};

type Result<T> = std::result::Result<T, DecodeError>;

/// Position of the decoder within the tsf grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Nothing but blank or comment lines seen yet
    Start,
    /// Last declaration was an `@attribute`
    ReadingAttributes,
    /// Last declaration was scalar metadata; header still open
    AwaitingDataTag,
    /// `@data` consumed; every data row is a series
    ReadingData,
    /// End of stream validated; the dataset is complete
    Done,
}

/// Decoder for tsf streams
#[derive(Debug, Clone, Default)]
pub struct TsfDecoder {
    config: DecodeConfig,
}

impl TsfDecoder {
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode a whole stream into a dataset
    pub fn decode<R: BufRead>(&self, reader: R) -> Result<Dataset> {
        decode_stream(reader, &self.config).map(|(dataset, _)| dataset)
    }

    /// Decode a whole stream, also returning line and value counters
    pub fn decode_with_stats<R: BufRead>(&self, reader: R) -> Result<(Dataset, DecodeStats)> {
        decode_stream(reader, &self.config)
    }
}

/// Decode a tsf stream with the given configuration
pub fn decode<R: BufRead>(reader: R, config: &DecodeConfig) -> Result<Dataset> {
    decode_stream(reader, config).map(|(dataset, _)| dataset)
}

/// Decode an in-memory tsf document
pub fn decode_str(content: &str, config: &DecodeConfig) -> Result<Dataset> {
    decode(content.as_bytes(), config)
}

fn decode_stream<R: BufRead>(mut reader: R, config: &DecodeConfig) -> Result<(Dataset, DecodeStats)> {
    let mut machine = FormatStateMachine::new(config);
    let mut buffer = Vec::new();
    let mut line_num = 0;

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| DecodeError::Io {
                line: line_num + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        line_num += 1;

        // Archives are often cp1252; undecodable bytes become U+FFFD
        let text = String::from_utf8_lossy(&buffer);
        machine.feed(text.trim(), line_num)?;
    }

    machine.complete(line_num)?;
    Ok(machine.into_parts())
}

/// Sequences metadata, data tag and data rows
struct FormatStateMachine<'c> {
    state: DecoderState,
    metadata: MetadataAccumulator,
    series: Vec<Series>,
    stats: DecodeStats,
    config: &'c DecodeConfig,
}

impl<'c> FormatStateMachine<'c> {
    fn new(config: &'c DecodeConfig) -> Self {
        Self {
            state: DecoderState::Start,
            metadata: MetadataAccumulator::new(),
            series: Vec::new(),
            stats: DecodeStats::new(),
            config,
        }
    }

    fn feed(&mut self, line: &str, line_num: usize) -> Result<()> {
        self.stats.lines_read += 1;

        self.state = match (self.state, classify(line)) {
            (state, LineKind::Blank) => {
                self.stats.blank_lines += 1;
                state
            }
            (state, LineKind::Comment) => {
                self.stats.comment_lines += 1;
                state
            }
            (DecoderState::ReadingData, LineKind::AttributeDecl) => {
                return Err(DecodeError::InvalidMetadataSpec {
                    line: line_num,
                    reason: "attributes cannot be declared after the @data tag".to_string(),
                });
            }
            (_, LineKind::AttributeDecl) => {
                self.stats.metadata_lines += 1;
                self.metadata.on_attribute_decl(line, line_num)?;
                DecoderState::ReadingAttributes
            }
            (state, LineKind::ScalarMetaDecl(key)) => {
                self.stats.metadata_lines += 1;
                self.metadata.on_scalar_meta_decl(key, line, line_num)?;
                match state {
                    DecoderState::ReadingData => DecoderState::ReadingData,
                    _ => DecoderState::AwaitingDataTag,
                }
            }
            (DecoderState::ReadingData, LineKind::DataTag) => {
                self.stats.metadata_lines += 1;
                DecoderState::ReadingData
            }
            (_, LineKind::DataTag) => {
                self.stats.metadata_lines += 1;
                if !self.metadata.has_attributes() {
                    return Err(DecodeError::MissingAttributeSection { line: line_num });
                }
                debug!(
                    "Data section starts at line {} with {} attributes",
                    line_num,
                    self.metadata.schema().len()
                );
                DecoderState::ReadingData
            }
            (DecoderState::ReadingData, LineKind::DataRow) => {
                let row = decode_series_row(
                    line,
                    line_num,
                    self.metadata.schema(),
                    self.config,
                )?;
                self.stats.series_decoded += 1;
                self.stats.values_decoded += row.series.len();
                self.stats.missing_values += row.missing_count;
                self.series.push(row.series);
                DecoderState::ReadingData
            }
            (_, LineKind::DataRow) => {
                return Err(DecodeError::MissingDataTag { line: line_num });
            }
        };

        Ok(())
    }

    fn state(&self) -> DecoderState {
        self.state
    }

    /// Validate the end of stream and move to `Done`
    fn complete(&mut self, last_line: usize) -> Result<()> {
        if self.stats.content_lines() == 0 {
            return Err(DecodeError::EmptyFile);
        }
        if !self.metadata.has_attributes() {
            return Err(DecodeError::MissingAttributeSection { line: last_line });
        }
        if self.state != DecoderState::ReadingData || self.series.is_empty() {
            return Err(DecodeError::MissingDataSection { line: last_line });
        }
        self.state = DecoderState::Done;

        debug!(
            "Decoder {:?}: {} series ({} values, {} missing) from {} lines",
            self.state(),
            self.stats.series_decoded,
            self.stats.values_decoded,
            self.stats.missing_values,
            self.stats.lines_read
        );
        Ok(())
    }

    fn into_parts(self) -> (Dataset, DecodeStats) {
        let (schema, meta) = self.metadata.finish();
        let dataset = Dataset {
            schema,
            meta,
            series: self.series,
        };
        (dataset, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let config = DecodeConfig::default();
        let mut machine = FormatStateMachine::new(&config);
        assert_eq!(machine.state(), DecoderState::Start);

        machine.feed("# header", 1).unwrap();
        assert_eq!(machine.state(), DecoderState::Start);

        machine.feed("@attribute series_name string", 2).unwrap();
        assert_eq!(machine.state(), DecoderState::ReadingAttributes);

        machine.feed("@frequency daily", 3).unwrap();
        assert_eq!(machine.state(), DecoderState::AwaitingDataTag);

        machine.feed("@attribute start_timestamp date", 4).unwrap();
        assert_eq!(machine.state(), DecoderState::ReadingAttributes);

        machine.feed("@data", 5).unwrap();
        assert_eq!(machine.state(), DecoderState::ReadingData);

        machine.feed("T1:2020-01-01 00-00-00:1,2", 6).unwrap();
        assert_eq!(machine.state(), DecoderState::ReadingData);

        machine.complete(6).unwrap();
        assert_eq!(machine.state(), DecoderState::Done);

        let (dataset, stats) = machine.into_parts();
        assert_eq!(dataset.series.len(), 1);
        assert_eq!(stats.lines_read, 6);
    }

    #[test]
    fn test_incomplete_stream_does_not_reach_done() {
        let config = DecodeConfig::default();
        let mut machine = FormatStateMachine::new(&config);
        machine.feed("@attribute series_name string", 1).unwrap();
        machine.feed("@data", 2).unwrap();

        assert!(matches!(
            machine.complete(2).unwrap_err(),
            DecodeError::MissingDataSection { line: 2 }
        ));
        assert_eq!(machine.state(), DecoderState::ReadingData);
    }
}
