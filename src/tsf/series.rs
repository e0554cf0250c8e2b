//! Data row decoding
//!
//! A data row is `attr_1:attr_2:...:attr_N:v_1,v_2,...,v_L`. Every `:` counts
//! as a field separator and every `,` in the payload as a value separator, so
//! string attributes cannot contain `:` and values cannot contain `,`.
//!
//! Checks run in a fixed order: field count, payload presence, numeric
//! tokens, all-missing, then each attribute in schema order.

use crate::config::DecodeConfig;
use crate::constants::{DATE_FORMAT, FIELD_SEPARATOR, MISSING_TOKEN, VALUE_SEPARATOR};
use crate::error::DecodeError;
use crate::models::{Attribute, AttributeKind, AttributeSchema, AttributeValue, Series};
use chrono::NaiveDateTime;

type Result<T> = std::result::Result<T, DecodeError>;

/// A decoded row together with the number of `?` tokens it contained
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub series: Series,
    pub missing_count: usize,
}

/// Decode one data row against a frozen schema
pub fn decode_series_row(
    line: &str,
    line_num: usize,
    schema: &AttributeSchema,
    config: &DecodeConfig,
) -> Result<DecodedRow> {
    let attribute_count = schema.len();
    let expected = attribute_count + 1;

    let mut fields = line.split(FIELD_SEPARATOR);
    let mut attribute_fields: Vec<&str> = Vec::with_capacity(attribute_count);
    for _ in 0..attribute_count {
        match fields.next() {
            Some(field) => attribute_fields.push(field),
            None => {
                return Err(DecodeError::MalformedSeriesRow {
                    line: line_num,
                    expected,
                    found: attribute_fields.len(),
                });
            }
        }
    }

    let payload = fields.next().ok_or(DecodeError::MalformedSeriesRow {
        line: line_num,
        expected,
        found: attribute_count,
    })?;

    let extra = fields.count();
    if extra > 0 {
        return Err(DecodeError::MalformedSeriesRow {
            line: line_num,
            expected,
            found: expected + extra,
        });
    }

    let (values, missing_count) = parse_payload(payload, line_num, config)?;

    let mut attribute_values = Vec::with_capacity(attribute_count);
    for (attribute, raw) in schema.into_iter().zip(attribute_fields) {
        let value = decode_attribute(attribute, raw, line_num)?;
        attribute_values.push((attribute.name.clone(), value));
    }

    Ok(DecodedRow {
        series: Series {
            attribute_values,
            values,
            source_line: line_num,
        },
        missing_count,
    })
}

/// Parse the comma-separated numeric payload of a row
///
/// The row fails when every value equals the missing sentinel, whether it was
/// written as `?` or as the sentinel itself.
fn parse_payload(payload: &str, line_num: usize, config: &DecodeConfig) -> Result<(Vec<f64>, usize)> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(DecodeError::EmptySeriesPayload { line: line_num });
    }

    let capacity = payload.bytes().filter(|&b| b == VALUE_SEPARATOR as u8).count() + 1;
    let mut values = Vec::with_capacity(capacity);
    let mut missing_count = 0;

    for token in payload.split(VALUE_SEPARATOR) {
        let token = token.trim();
        if token == MISSING_TOKEN {
            values.push(config.missing_value);
            missing_count += 1;
        } else {
            let value = token
                .parse::<f64>()
                .map_err(|_| DecodeError::InvalidNumericValue {
                    line: line_num,
                    token: token.to_string(),
                })?;
            values.push(value);
        }
    }

    if values.iter().all(|&value| config.is_missing(value)) {
        return Err(DecodeError::AllValuesMissing { line: line_num });
    }

    Ok((values, missing_count))
}

/// Decode one leading field according to its declared attribute type
fn decode_attribute(attribute: &Attribute, raw: &str, line_num: usize) -> Result<AttributeValue> {
    let kind = attribute
        .kind()
        .ok_or_else(|| DecodeError::UnsupportedAttributeType {
            line: line_num,
            attribute: attribute.name.clone(),
            type_name: attribute.type_name.clone(),
        })?;

    let invalid = || DecodeError::InvalidAttributeValue {
        line: line_num,
        attribute: attribute.name.clone(),
        value: raw.to_string(),
    };

    match kind {
        AttributeKind::Numeric => raw
            .trim()
            .parse::<i64>()
            .map(AttributeValue::Numeric)
            .map_err(|_| invalid()),
        AttributeKind::String => Ok(AttributeValue::String(raw.to_string())),
        AttributeKind::Date => NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
            .map(AttributeValue::Date)
            .map_err(|_| invalid()),
    }
}
