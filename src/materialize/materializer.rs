//! Expansion of decoded series into timestamped records
//!
//! Frequency problems abort the whole call, since the frequency is shared by
//! every series. Problems with a single series only skip that series and are
//! reported through [`Materialization::diagnostics`].

use chrono::NaiveDateTime;
use std::fmt;
use tracing::{debug, warn};

use super::frequency::Frequency;
use crate::config::MaterializeConfig;
use crate::error::MaterializeError;
use crate::models::{Dataset, Series, TimedRecord};

/// Why a series was left out of a materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesIssueKind {
    /// The identifier attribute is not in the schema
    MissingSeriesId,
    /// The start attribute is absent or not a date
    MissingStartTimestamp,
    /// The series has no values
    EmptySeries,
    /// The last timestamp falls outside the supported calendar range
    TimestampOverflow,
}

/// A skipped series and the reason it was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesIssue {
    /// Position of the series within the dataset
    pub index: usize,
    pub source_line: usize,
    pub series_id: Option<String>,
    pub kind: SeriesIssueKind,
}

impl fmt::Display for SeriesIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            SeriesIssueKind::MissingSeriesId => "no series identifier",
            SeriesIssueKind::MissingStartTimestamp => "no start timestamp",
            SeriesIssueKind::EmptySeries => "no values",
            SeriesIssueKind::TimestampOverflow => "timestamps overflow the calendar",
        };
        write!(
            f,
            "series {} (line {}): {}",
            self.series_id.as_deref().unwrap_or("<unnamed>"),
            self.source_line,
            reason
        )
    }
}

/// A series that passed all checks and can be expanded
#[derive(Debug, Clone)]
struct SeriesPlan<'a> {
    series_id: String,
    start: NaiveDateTime,
    series: &'a Series,
}

/// Result of materializing a dataset
///
/// Records are not stored: [`Materialization::records`] recomputes them from
/// the borrowed dataset on every call.
#[derive(Debug, Clone)]
pub struct Materialization<'a> {
    frequency: Frequency,
    plans: Vec<SeriesPlan<'a>>,
    diagnostics: Vec<SeriesIssue>,
}

impl<'a> Materialization<'a> {
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Lazily expand every valid series, ordered by series then offset
    pub fn records(&self) -> impl Iterator<Item = TimedRecord> + '_ {
        let frequency = self.frequency;
        self.plans.iter().flat_map(move |plan| {
            plan.series
                .values
                .iter()
                .enumerate()
                .filter_map(move |(offset, &value)| {
                    let timestamp = frequency.offset(plan.start, offset as u32)?;
                    Some(TimedRecord {
                        series_id: plan.series_id.clone(),
                        timestamp,
                        value,
                    })
                })
        })
    }

    /// Series that were skipped
    pub fn diagnostics(&self) -> &[SeriesIssue] {
        &self.diagnostics
    }

    /// Number of series that produce records
    pub fn series_count(&self) -> usize {
        self.plans.len()
    }

    /// Number of records [`Materialization::records`] yields
    pub fn record_count(&self) -> usize {
        self.plans.iter().map(|plan| plan.series.len()).sum()
    }
}

/// Timestamp materializer
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    config: MaterializeConfig,
}

impl Materializer {
    pub fn new(config: MaterializeConfig) -> Self {
        Self { config }
    }

    /// Check the dataset frequency and every series, without expanding
    pub fn materialize<'a>(
        &self,
        dataset: &'a Dataset,
    ) -> Result<Materialization<'a>, MaterializeError> {
        let frequency = Frequency::from_declared(dataset.meta.frequency.as_deref())?;

        let mut plans = Vec::with_capacity(dataset.series.len());
        let mut diagnostics = Vec::new();

        for (index, series) in dataset.series.iter().enumerate() {
            match self.plan_series(frequency, series) {
                Ok(plan) => plans.push(plan),
                Err((series_id, kind)) => {
                    let issue = SeriesIssue {
                        index,
                        source_line: series.source_line,
                        series_id,
                        kind,
                    };
                    warn!("Skipping {}", issue);
                    diagnostics.push(issue);
                }
            }
        }

        debug!(
            "Materializing {} series at {} frequency ({} skipped)",
            plans.len(),
            frequency,
            diagnostics.len()
        );

        Ok(Materialization {
            frequency,
            plans,
            diagnostics,
        })
    }

    fn plan_series<'a>(
        &self,
        frequency: Frequency,
        series: &'a Series,
    ) -> Result<SeriesPlan<'a>, (Option<String>, SeriesIssueKind)> {
        let series_id = match series.attribute(&self.config.id_attribute) {
            Some(value) => value.to_string(),
            None => return Err((None, SeriesIssueKind::MissingSeriesId)),
        };

        let start = match series
            .attribute(&self.config.start_attribute)
            .and_then(|value| value.as_date())
        {
            Some(start) => start,
            None => return Err((Some(series_id), SeriesIssueKind::MissingStartTimestamp)),
        };

        if series.is_empty() {
            return Err((Some(series_id), SeriesIssueKind::EmptySeries));
        }

        let last_offset = u32::try_from(series.len() - 1).ok();
        if last_offset.and_then(|offset| frequency.offset(start, offset)).is_none() {
            return Err((Some(series_id), SeriesIssueKind::TimestampOverflow));
        }

        Ok(SeriesPlan {
            series_id,
            start,
            series,
        })
    }
}

/// Materialize a dataset using the default `series_name` / `start_timestamp` attributes
pub fn materialize(dataset: &Dataset) -> Result<Materialization<'_>, MaterializeError> {
    Materializer::default().materialize(dataset)
}
