//! Period selection for the dashboard widgets.
//!
//! The UI offers "all" for both year and month, but the monthly widgets
//! never show all-time totals: an "all" component resolves to the current
//! year or month. [`PeriodFilter::effective`] performs that resolution.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// A year or month picked in the UI, or the "all" placeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy> Selection<T> {
    /// The selected value, or `fallback` for "all".
    pub fn or(self, fallback: T) -> T {
        match self {
            Self::All => fallback,
            Self::Only(value) => value,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse()
            .map(Self::Only)
            .map_err(|_| EngineError::InvalidPeriod(format!("not a number or \"all\": {trimmed}")))
    }
}

/// A calendar month. Orders chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Bucket key used by the charts, e.g. `2024-03`.
    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human label, e.g. `Mar 2024`.
    pub fn display_label(self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%b %Y").to_string(),
            None => self.label(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The (year, month) filter of the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub year: Selection<i32>,
    pub month: Selection<u32>,
}

impl PeriodFilter {
    pub fn new(year: Selection<i32>, month: Selection<u32>) -> ResultEngine<Self> {
        if let Selection::Only(month) = month {
            YearMonth::new(0, month)?;
        }
        Ok(Self { year, month })
    }

    /// Resolves "all" placeholders against `today`.
    pub fn effective(&self, today: NaiveDate) -> YearMonth {
        YearMonth {
            year: self.year.or(today.year()),
            month: self.month.or(today.month()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_falls_back_to_today() {
        let today = day(2025, 7, 14);
        let filter = PeriodFilter::default();
        assert_eq!(filter.effective(today), YearMonth { year: 2025, month: 7 });

        let filter = PeriodFilter::new(Selection::Only(2023), Selection::All).unwrap();
        assert_eq!(filter.effective(today), YearMonth { year: 2023, month: 7 });

        let filter = PeriodFilter::new(Selection::All, Selection::Only(2)).unwrap();
        assert_eq!(filter.effective(today), YearMonth { year: 2025, month: 2 });
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(PeriodFilter::new(Selection::All, Selection::Only(13)).is_err());
        assert!(PeriodFilter::new(Selection::All, Selection::Only(0)).is_err());
    }

    #[test]
    fn selection_parses_all_or_number() {
        assert_eq!("all".parse::<Selection<i32>>().unwrap(), Selection::All);
        assert_eq!("ALL".parse::<Selection<u32>>().unwrap(), Selection::All);
        assert_eq!(" 2024 ".parse::<Selection<i32>>().unwrap(), Selection::Only(2024));
        assert!("march".parse::<Selection<u32>>().is_err());
    }

    #[test]
    fn labels() {
        let ym = YearMonth::new(2024, 3).unwrap();
        assert_eq!(ym.label(), "2024-03");
        assert_eq!(ym.display_label(), "Mar 2024");
        assert!(ym.contains(day(2024, 3, 31)));
        assert!(!ym.contains(day(2023, 3, 1)));
    }
}
