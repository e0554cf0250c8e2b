//! Timestamp materialization for decoded datasets
//!
//! Turns each series into `(series_id, timestamp, value)` records at
//! `start + k * step`, where the step comes from the dataset frequency:
//!
//! | frequency   | step              |
//! |-------------|-------------------|
//! | `yearly`    | 1 calendar year   |
//! | `quarterly` | 3 calendar months |
//! | `monthly`   | 1 calendar month  |
//! | `daily`     | 1 day             |

pub mod frequency;
pub mod materializer;


pub use frequency::{CalendarStep, Frequency};
pub use materializer::{Materialization, Materializer, SeriesIssue, SeriesIssueKind, materialize};
