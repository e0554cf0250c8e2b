//! Core data structures for decoded tsf datasets.
//!
//! Defines the attribute schema, dataset-level metadata, decoded series and
//! the timestamped records produced by materialization.

use crate::constants::attribute_types;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute types supported by the tsf format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Numeric,
    String,
    Date,
}

impl AttributeKind {
    /// Resolve a declared type token, `None` for unsupported types
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            attribute_types::NUMERIC => Some(AttributeKind::Numeric),
            attribute_types::STRING => Some(AttributeKind::String),
            attribute_types::DATE => Some(AttributeKind::Date),
            _ => None,
        }
    }
}

/// One `@attribute` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Type token exactly as declared
    pub type_name: String,
    kind: Option<AttributeKind>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let kind = AttributeKind::from_type_name(&type_name);
        Self {
            name: name.into(),
            type_name,
            kind,
        }
    }

    /// Resolved kind, `None` when the declared type is not supported
    pub fn kind(&self) -> Option<AttributeKind> {
        self.kind
    }
}

/// Ordered attribute declarations; order drives positional row decoding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Position of the first attribute with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}

impl<'a> IntoIterator for &'a AttributeSchema {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

/// Dataset-level scalar metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub frequency: Option<String>,
    pub forecast_horizon: Option<i64>,
    pub contains_missing: Option<bool>,
    pub contains_equal_length: Option<bool>,
}

/// Typed value of one attribute for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Numeric(i64),
    String(String),
    Date(NaiveDateTime),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Numeric(_) => AttributeKind::Numeric,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Date(_) => AttributeKind::Date,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            AttributeValue::Date(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Numeric(n) => write!(f, "{}", n),
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// One decoded data row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// One value per schema attribute, in schema order
    pub attribute_values: Vec<(String, AttributeValue)>,
    /// Observations; `?` tokens hold the configured missing sentinel
    pub values: Vec<f64>,
    pub source_line: usize,
}

impl Series {
    /// Value of the first attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attribute_values
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A fully decoded tsf stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: AttributeSchema,
    pub meta: DatasetMeta,
    pub series: Vec<Series>,
}

impl Dataset {
    /// Whether every series has the same number of values
    pub fn has_equal_lengths(&self) -> bool {
        match self.series.first() {
            Some(first) => self.series.iter().all(|s| s.len() == first.len()),
            None => true,
        }
    }

    /// Shortest and longest series length
    pub fn length_range(&self) -> Option<(usize, usize)> {
        let min = self.series.iter().map(Series::len).min()?;
        let max = self.series.iter().map(Series::len).max()?;
        Some((min, max))
    }

    /// Total number of observations across all series
    pub fn total_values(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }
}

/// One expanded observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedRecord {
    pub series_id: String,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(name: &str, values: Vec<f64>) -> Series {
        Series {
            attribute_values: vec![(
                "series_name".to_string(),
                AttributeValue::String(name.to_string()),
            )],
            values,
            source_line: 1,
        }
    }

    #[test]
    fn test_attribute_kind_resolution() {
        assert_eq!(Attribute::new("a", "numeric").kind(), Some(AttributeKind::Numeric));
        assert_eq!(Attribute::new("a", "string").kind(), Some(AttributeKind::String));
        assert_eq!(Attribute::new("a", "date").kind(), Some(AttributeKind::Date));
        assert_eq!(Attribute::new("a", "float").kind(), None);
        assert_eq!(Attribute::new("a", "Numeric").kind(), None);
    }

    #[test]
    fn test_schema_index_of_first_match() {
        let mut schema = AttributeSchema::new();
        schema.push(Attribute::new("series_name", "string"));
        schema.push(Attribute::new("start_timestamp", "date"));
        schema.push(Attribute::new("series_name", "string"));

        assert_eq!(schema.index_of("series_name"), Some(0));
        assert_eq!(schema.index_of("start_timestamp"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }

    #[test]
    fn test_attribute_value_display() {
        let date = NaiveDate::from_ymd_opt(1979, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(AttributeValue::Numeric(42).to_string(), "42");
        assert_eq!(AttributeValue::String("T1".into()).to_string(), "T1");
        assert_eq!(AttributeValue::Date(date).to_string(), "1979-01-01 00:00:00");
    }

    #[test]
    fn test_dataset_length_helpers() {
        let dataset = Dataset {
            schema: AttributeSchema::new(),
            meta: DatasetMeta::default(),
            series: vec![series("T1", vec![1.0, 2.0]), series("T2", vec![1.0, 2.0, 3.0])],
        };

        assert!(!dataset.has_equal_lengths());
        assert_eq!(dataset.length_range(), Some((2, 3)));
        assert_eq!(dataset.total_values(), 5);
        assert_eq!(
            dataset.series[1].attribute("series_name"),
            Some(&AttributeValue::String("T2".into()))
        );
    }
}
