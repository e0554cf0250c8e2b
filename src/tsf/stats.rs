//! Decoding statistics for tsf streams

use serde::{Deserialize, Serialize};

/// Counters collected while decoding one stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Physical lines read, including blank ones
    pub lines_read: usize,

    /// Lines that were empty after stripping
    pub blank_lines: usize,

    /// `#` comment lines
    pub comment_lines: usize,

    /// `@` declarations, including the data tag
    pub metadata_lines: usize,

    /// Number of series decoded from data rows
    pub series_decoded: usize,

    /// Total values across all series
    pub values_decoded: usize,

    /// Values given as `?`
    pub missing_values: usize,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines carrying content (anything but blank lines)
    pub fn content_lines(&self) -> usize {
        self.lines_read - self.blank_lines
    }

    /// Share of values given as `?`, as a percentage
    pub fn missing_rate(&self) -> f64 {
        if self.values_decoded == 0 {
            0.0
        } else {
            (self.missing_values as f64 / self.values_decoded as f64) * 100.0
        }
    }
}
