use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::WorkEntry;

/// Total experience in years, held as whole tenths so the figure is always a multiple of 0.1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExperienceYears {
    tenths: u32,
}

impl ExperienceYears {
    pub const ZERO: Self = Self { tenths: 0 };

    pub const fn from_tenths(tenths: u32) -> Self {
        Self { tenths }
    }

    /// Converts whole months to years, rounding half-up on the tenths digit.
    pub const fn from_months(months: u32) -> Self {
        Self {
            tenths: months.saturating_mul(10).saturating_add(6) / 12,
        }
    }

    /// Nearest tenth of a fractional year figure; negative or non-finite input is zero.
    pub fn from_years(years: f64) -> Self {
        if !years.is_finite() || years <= 0.0 {
            return Self::ZERO;
        }
        Self {
            tenths: (years * 10.0).round().min(u32::MAX as f64) as u32,
        }
    }

    pub const fn tenths(self) -> u32 {
        self.tenths
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.tenths) / 10.0
    }
}

impl fmt::Display for ExperienceYears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

impl Serialize for ExperienceYears {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for ExperienceYears {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::from_years)
    }
}

/// Whole calendar months covered by one entry, ignoring day of month.
///
/// Entries without a start date, or ending before they start, contribute nothing.
pub fn entry_months(entry: &WorkEntry, now: NaiveDate) -> u32 {
    let Some(start) = entry.start_date else {
        return 0;
    };

    let end = if entry.current {
        now
    } else {
        entry.end_date.unwrap_or(start)
    };

    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    months.max(0) as u32
}

/// Sum of all entries' months converted to years. `now` must be one snapshot per evaluation.
pub fn total_years(entries: &[WorkEntry], now: NaiveDate) -> ExperienceYears {
    let months = entries
        .iter()
        .map(|entry| entry_months(entry, now))
        .fold(0u32, u32::saturating_add);
    ExperienceYears::from_months(months)
}
