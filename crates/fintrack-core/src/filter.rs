//! Month/year filter selecting which transactions are in view

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid month: {month} (expected 1-12)")]
    InvalidMonth { month: u32 },
}

/// A calendar (month, year) pair. `month` is always within 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth { month });
        }
        Ok(Self { month, year })
    }

    /// The period containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// The period containing today's local date
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn with_month(self, month: u32) -> Result<Self, PeriodError> {
        Self::new(month, self.year)
    }

    pub fn with_year(self, year: i32) -> Self {
        Self { year, ..self }
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The active filter. Only the engine holds one; every change is a
/// trigger for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    period: Period,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Period::current())
    }
}

impl FilterState {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Returns whether the filter changed
    pub fn set_month(&mut self, month: u32) -> Result<bool, PeriodError> {
        let next = self.period.with_month(month)?;
        Ok(self.set_period(next))
    }

    /// Any year is accepted. Returns whether the filter changed.
    pub fn set_year(&mut self, year: i32) -> bool {
        let next = self.period.with_year(year);
        self.set_period(next)
    }

    pub fn set_period(&mut self, period: Period) -> bool {
        let changed = self.period != period;
        self.period = period;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_rejects_out_of_range_month() {
        assert_eq!(Period::new(0, 2024), Err(PeriodError::InvalidMonth { month: 0 }));
        assert_eq!(Period::new(13, 2024), Err(PeriodError::InvalidMonth { month: 13 }));
        assert!(Period::new(12, 2024).is_ok());
    }

    #[test]
    fn test_period_accepts_any_year() {
        assert_eq!(Period::new(1, -44).unwrap().year(), -44);
        assert_eq!(Period::new(6, 9999).unwrap().year(), 9999);
    }

    #[test]
    fn test_period_contains() {
        let jan = Period::new(1, 2024).unwrap();
        assert!(jan.contains(&date(2024, 1, 1)));
        assert!(jan.contains(&date(2024, 1, 31)));
        assert!(!jan.contains(&date(2024, 2, 1)));
        assert!(!jan.contains(&date(2023, 1, 15)));
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::new(3, 2024).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn test_filter_state_changes() {
        let mut filter = FilterState::new(Period::new(1, 2024).unwrap());

        assert_eq!(filter.set_month(1), Ok(false));
        assert_eq!(filter.set_month(2), Ok(true));
        assert!(filter.set_month(13).is_err());
        assert_eq!(filter.period(), Period::new(2, 2024).unwrap());

        assert!(filter.set_year(2025));
        assert!(!filter.set_year(2025));
        assert_eq!(filter.period(), Period::new(2, 2025).unwrap());
    }

    #[test]
    fn test_filter_defaults_to_current_month() {
        let today = Local::now().date_naive();
        assert!(FilterState::default().period().contains(&today));
    }
}
