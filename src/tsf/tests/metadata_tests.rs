//! Tests for tsf header metadata accumulation

use super::super::metadata::{MetadataAccumulator, parse_flag};
use crate::error::DecodeError;
use crate::models::{AttributeKind, DatasetMeta};

#[test]
fn test_attribute_declarations_keep_order() {
    let mut acc = MetadataAccumulator::new();
    acc.on_attribute_decl("@attribute series_name string", 1).unwrap();
    acc.on_attribute_decl("@attribute start_timestamp date", 2).unwrap();
    acc.on_attribute_decl("@attribute  store\tnumeric", 3).unwrap();

    let (schema, _) = acc.finish();
    let names: Vec<&str> = schema.attributes().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["series_name", "start_timestamp", "store"]);
    assert_eq!(schema.attributes()[2].kind(), Some(AttributeKind::Numeric));
}

#[test]
fn test_attribute_with_wrong_token_count() {
    let mut acc = MetadataAccumulator::new();

    let missing_type = acc.on_attribute_decl("@attribute series_name", 7).unwrap_err();
    assert!(matches!(
        missing_type,
        DecodeError::InvalidMetadataSpec { line: 7, .. }
    ));

    let extra_token = acc
        .on_attribute_decl("@attribute series name string", 8)
        .unwrap_err();
    assert!(matches!(
        extra_token,
        DecodeError::InvalidMetadataSpec { line: 8, .. }
    ));

    assert!(!acc.has_attributes());
}

#[test]
fn test_unsupported_type_accepted_at_declaration() {
    let mut acc = MetadataAccumulator::new();
    acc.on_attribute_decl("@attribute weight float", 1).unwrap();

    assert!(acc.has_attributes());
    assert_eq!(acc.schema().attributes()[0].kind(), None);
    assert_eq!(acc.schema().attributes()[0].type_name, "float");
}

#[test]
fn test_scalar_metadata() {
    let mut acc = MetadataAccumulator::new();
    acc.on_scalar_meta_decl("frequency", "@frequency monthly", 1).unwrap();
    acc.on_scalar_meta_decl("horizon", "@horizon 18", 2).unwrap();
    acc.on_scalar_meta_decl("missing", "@missing false", 3).unwrap();
    acc.on_scalar_meta_decl("equallength", "@equallength TRUE", 4).unwrap();

    let meta = acc.meta();
    assert_eq!(meta.frequency.as_deref(), Some("monthly"));
    assert_eq!(meta.forecast_horizon, Some(18));
    assert_eq!(meta.contains_missing, Some(false));
    assert_eq!(meta.contains_equal_length, Some(true));
}

#[test]
fn test_unrecognized_keys_are_ignored() {
    let mut acc = MetadataAccumulator::new();
    acc.on_scalar_meta_decl("relation", "@relation tourism", 1).unwrap();
    assert_eq!(acc.meta(), &DatasetMeta::default());
}

#[test]
fn test_scalar_metadata_token_count() {
    let mut acc = MetadataAccumulator::new();

    let err = acc.on_scalar_meta_decl("frequency", "@frequency", 3).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidMetadataSpec { line: 3, .. }));

    // Count is checked before the key is looked at
    let err = acc
        .on_scalar_meta_decl("relation", "@relation two words", 4)
        .unwrap_err();
    assert!(matches!(err, DecodeError::InvalidMetadataSpec { line: 4, .. }));
}

#[test]
fn test_invalid_horizon() {
    let mut acc = MetadataAccumulator::new();
    match acc.on_scalar_meta_decl("horizon", "@horizon 4.5", 5).unwrap_err() {
        DecodeError::InvalidHorizonValue { line, value } => {
            assert_eq!(line, 5);
            assert_eq!(value, "4.5");
        }
        other => panic!("Expected InvalidHorizonValue, got {:?}", other),
    }
}

#[test]
fn test_invalid_boolean() {
    let mut acc = MetadataAccumulator::new();
    match acc.on_scalar_meta_decl("missing", "@missing maybe", 2).unwrap_err() {
        DecodeError::InvalidBooleanValue { line, key, value } => {
            assert_eq!(line, 2);
            assert_eq!(key, "missing");
            assert_eq!(value, "maybe");
        }
        other => panic!("Expected InvalidBooleanValue, got {:?}", other),
    }
}

#[test]
fn test_parse_flag_tokens() {
    for token in ["y", "yes", "t", "true", "on", "1", "Yes", "ON"] {
        assert!(parse_flag("missing", token, 1).unwrap(), "{}", token);
    }
    for token in ["n", "no", "f", "false", "off", "0", "False", "OFF"] {
        assert!(!parse_flag("missing", token, 1).unwrap(), "{}", token);
    }
    assert!(parse_flag("missing", "2", 1).is_err());
}
