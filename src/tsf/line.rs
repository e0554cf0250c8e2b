//! Line classification for tsf streams
//!
//! Every stripped input line falls into exactly one [`LineKind`]. The
//! classifier is pure: it only looks at the line's prefix.

use crate::constants::{ATTRIBUTE_TAG, COMMENT_PREFIX, DATA_TAG, METADATA_PREFIX};

/// Category of a single tsf line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    AttributeDecl,
    /// Scalar metadata keyed by the token after `@`
    ScalarMetaDecl(&'a str),
    DataTag,
    DataRow,
}

/// Classify an already stripped line
pub fn classify(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with(COMMENT_PREFIX) {
        LineKind::Comment
    } else if line.starts_with(DATA_TAG) {
        LineKind::DataTag
    } else if line.starts_with(ATTRIBUTE_TAG) {
        LineKind::AttributeDecl
    } else if let Some(rest) = line.strip_prefix(METADATA_PREFIX) {
        let key = rest.split_whitespace().next().unwrap_or("");
        LineKind::ScalarMetaDecl(key)
    } else {
        LineKind::DataRow
    }
}
