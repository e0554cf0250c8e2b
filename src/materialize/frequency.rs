//! Frequency to calendar step mapping

use crate::error::MaterializeError;
use chrono::{Days, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling frequencies that can be expanded into a regular time index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Yearly,
    Quarterly,
    Monthly,
    Daily,
}

/// Distance between two consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarStep {
    Months(u32),
    Days(u64),
}

impl Frequency {
    /// Resolve the frequency declared in a dataset header
    pub fn from_declared(frequency: Option<&str>) -> Result<Self, MaterializeError> {
        let unsupported = || MaterializeError::UnsupportedFrequency {
            frequency: frequency.map(str::to_string),
        };
        frequency.ok_or_else(unsupported)?.parse().map_err(|_| unsupported())
    }

    pub fn step(&self) -> CalendarStep {
        match self {
            Frequency::Yearly => CalendarStep::Months(12),
            Frequency::Quarterly => CalendarStep::Months(3),
            Frequency::Monthly => CalendarStep::Months(1),
            Frequency::Daily => CalendarStep::Days(1),
        }
    }

    /// Timestamp `offset` steps after `start`, `None` past the calendar range.
    ///
    /// Month steps are applied from `start` in one go, so a start on the 31st
    /// clamps to the end of shorter months without drifting afterwards.
    pub fn offset(&self, start: NaiveDateTime, offset: u32) -> Option<NaiveDateTime> {
        match self.step() {
            CalendarStep::Months(months) => {
                start.checked_add_months(Months::new(months.checked_mul(offset)?))
            }
            CalendarStep::Days(days) => start.checked_add_days(Days::new(days * offset as u64)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Yearly => "yearly",
            Frequency::Quarterly => "quarterly",
            Frequency::Monthly => "monthly",
            Frequency::Daily => "daily",
        }
    }
}

impl FromStr for Frequency {
    type Err = MaterializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(Frequency::Yearly),
            "quarterly" => Ok(Frequency::Quarterly),
            "monthly" => Ok(Frequency::Monthly),
            "daily" => Ok(Frequency::Daily),
            other => Err(MaterializeError::UnsupportedFrequency {
                frequency: Some(other.to_string()),
            }),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
