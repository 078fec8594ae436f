use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

use crate::error::{Result, SheetError};

/// A calendar month of a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SheetError::InvalidArgument(format!(
                "month must be within 1-12, got {}",
                month
            )));
        }

        // Both ends of the month have to be representable, not just the first day.
        let period = Period { year, month };
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() || period.next_first_day().is_none() {
            return Err(SheetError::InvalidArgument(format!(
                "year {} is out of the supported calendar range",
                year
            )));
        }

        Ok(period)
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    fn next_first_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year.checked_add(1)?, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    /// Number of days in the month (proleptic Gregorian calendar).
    pub fn days_in_month(&self) -> u32 {
        match self.next_first_day() {
            Some(next) => next.signed_duration_since(self.first_day()).num_days() as u32,
            None => 31,
        }
    }

    /// Every date of the month, in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        first.iter_days().take(self.days_in_month() as usize)
    }

    /// Four-digit year and full month name, e.g. `2024 October`.
    pub fn title_label(&self) -> String {
        self.first_day().format("%Y %B").to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_month_out_of_range() {
        assert!(matches!(
            Period::new(2024, 0),
            Err(SheetError::InvalidArgument(_))
        ));
        assert!(matches!(
            Period::new(2024, 13),
            Err(SheetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn february_follows_leap_years() {
        assert_eq!(Period::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(Period::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(2000, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let december = Period::new(2024, 12).unwrap();
        assert_eq!(december.days_in_month(), 31);
        let last = december.days().last().unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn days_are_ascending_and_complete() {
        let period = Period::new(2024, 4).unwrap();
        let days: Vec<u32> = period.days().map(|d| d.day()).collect();
        assert_eq!(days, (1..=30).collect::<Vec<_>>());
        assert!(period.days().all(|d| Period::containing(d) == period));
    }

    #[test]
    fn title_label_uses_full_month_name() {
        assert_eq!(Period::new(2024, 10).unwrap().title_label(), "2024 October");
        assert_eq!(Period::new(2025, 1).unwrap().to_string(), "2025-01");
    }
}
