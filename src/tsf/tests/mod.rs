//! Test utilities for tsf decoder testing
//!
//! This module provides fixture documents and helpers shared by the
//! decoder test modules.

use crate::config::DecodeConfig;
use crate::error::DecodeError;
use crate::models::{Attribute, AttributeSchema, Dataset};

mod metadata_tests;

/// Helper to create a small yearly tsf document
pub fn create_yearly_tsf() -> String {
    r#"# Dataset information
# Subset of the M1 yearly competition data
@relation m1_yearly
@attribute series_name string
@attribute start_timestamp date
@frequency yearly
@horizon 6
@missing true
@equallength false

@data
T1:1979-01-01 00-00-00:10,20,?,40
T2:1982-01-01 00-00-00:5.5,6.25,7
T3:1990-01-01 00-00-00:100
"#
    .to_string()
}

/// Helper to create a document using every attribute type
pub fn create_mixed_types_tsf() -> String {
    r#"@attribute series_name string
@attribute state string
@attribute store numeric
@attribute start_timestamp date
@frequency daily
@data
S1:NSW:12:2011-01-29 00-00-00:1,2,3,4
S2:VIC:7:2011-01-29 00-00-00:?,2,3,4
"#
    .to_string()
}

/// Helper to build a schema from (name, type) pairs
pub fn schema_of(pairs: &[(&str, &str)]) -> AttributeSchema {
    let mut schema = AttributeSchema::new();
    for (name, type_name) in pairs {
        schema.push(Attribute::new(*name, *type_name));
    }
    schema
}

/// Decode with the default configuration
pub fn decode_default(content: &str) -> Result<Dataset, DecodeError> {
    super::decode_str(content, &DecodeConfig::default())
}
