//! tsf header parsing and metadata accumulation
//!
//! Consumes `@attribute` and scalar `@key value` declarations, building the
//! attribute schema and dataset-level metadata. Duplicate scalar declarations
//! are accepted and the last one wins.

use crate::constants::{FALSY_TOKENS, TRUTHY_TOKENS, meta_keys};
use crate::error::DecodeError;
use crate::models::{Attribute, AttributeSchema, DatasetMeta};
use tracing::debug;

type Result<T> = std::result::Result<T, DecodeError>;

/// Builder for the schema and scalar metadata of one stream
#[derive(Debug, Default)]
pub struct MetadataAccumulator {
    schema: AttributeSchema,
    meta: DatasetMeta,
}

impl MetadataAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle an `@attribute <name> <type>` line
    pub fn on_attribute_decl(&mut self, line: &str, line_num: usize) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let (_, name, type_name) = match (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        {
            (Some(tag), Some(name), Some(type_name), None) => (tag, name, type_name),
            _ => {
                return Err(DecodeError::InvalidMetadataSpec {
                    line: line_num,
                    reason: "attributes need exactly a name and a type".to_string(),
                });
            }
        };

        debug!("Attribute {}: {} ({})", self.schema.len(), name, type_name);
        self.schema.push(Attribute::new(name, type_name));
        Ok(())
    }

    /// Handle a scalar `@<key> <value>` line
    pub fn on_scalar_meta_decl(&mut self, key: &str, line: &str, line_num: usize) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let value = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(_), Some(value), None) => value,
            _ => {
                return Err(DecodeError::InvalidMetadataSpec {
                    line: line_num,
                    reason: format!("@{} needs exactly one value", key),
                });
            }
        };

        match key {
            meta_keys::FREQUENCY => {
                self.meta.frequency = Some(value.to_string());
            }
            meta_keys::HORIZON => {
                let horizon =
                    value
                        .parse::<i64>()
                        .map_err(|_| DecodeError::InvalidHorizonValue {
                            line: line_num,
                            value: value.to_string(),
                        })?;
                self.meta.forecast_horizon = Some(horizon);
            }
            meta_keys::MISSING => {
                self.meta.contains_missing = Some(parse_flag(key, value, line_num)?);
            }
            meta_keys::EQUAL_LENGTH => {
                self.meta.contains_equal_length = Some(parse_flag(key, value, line_num)?);
            }
            _ => {
                debug!("Ignoring unrecognized metadata @{} at line {}", key, line_num);
            }
        }

        Ok(())
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn meta(&self) -> &DatasetMeta {
        &self.meta
    }

    pub fn has_attributes(&self) -> bool {
        !self.schema.is_empty()
    }

    /// Freeze into the final schema and metadata
    pub fn finish(self) -> (AttributeSchema, DatasetMeta) {
        (self.schema, self.meta)
    }
}

/// Parse a boolean metadata token (`true`/`false`, `yes`/`no`, `1`/`0`, ...)
pub fn parse_flag(key: &str, value: &str, line_num: usize) -> Result<bool> {
    let lowered = value.to_ascii_lowercase();
    if TRUTHY_TOKENS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY_TOKENS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(DecodeError::InvalidBooleanValue {
            line: line_num,
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
