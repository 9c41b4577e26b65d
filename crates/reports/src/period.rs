//! Symbolic period resolution.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if the range contains the given date.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Returns the first day of the month containing `date`.
fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Resolves a symbolic period name to a concrete date range relative to
/// `today`.
///
/// Recognized names: `today`, `yesterday`, `this_week` (week starts Monday),
/// `this_month`, `last_month`, `this_year`. Any other name resolves to the
/// current month; unknown periods are a fallback, not an error.
pub fn resolve_period(name: &str, today: NaiveDate) -> DateRange {
    match name {
        "today" => DateRange::new(today, today),
        "yesterday" => {
            let yesterday = today - Days::new(1);
            DateRange::new(yesterday, yesterday)
        }
        "this_week" => {
            let offset = today.weekday().num_days_from_monday() as u64;
            DateRange::new(today - Days::new(offset), today)
        }
        "last_month" => {
            let last_of_prev = first_of_month(today) - Days::new(1);
            DateRange::new(first_of_month(last_of_prev), last_of_prev)
        }
        "this_year" => {
            let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            DateRange::new(jan_first, today)
        }
        // "this_month" and everything unrecognized
        _ => DateRange::new(first_of_month(today), today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        let today = date(2026, 8, 29);

        assert_eq!(resolve_period("today", today), DateRange::new(today, today));
        assert_eq!(
            resolve_period("yesterday", today),
            DateRange::new(date(2026, 8, 28), date(2026, 8, 28))
        );
    }

    #[test]
    fn test_this_week_starts_monday() {
        // 2026-08-26 is a Wednesday; the week began Monday the 24th.
        let wednesday = date(2026, 8, 26);
        let range = resolve_period("this_week", wednesday);

        assert_eq!(range.start, date(2026, 8, 24));
        assert_eq!(range.end, wednesday);
    }

    #[test]
    fn test_this_week_on_a_monday() {
        let monday = date(2026, 8, 24);
        assert_eq!(
            resolve_period("this_week", monday),
            DateRange::new(monday, monday)
        );
    }

    #[test]
    fn test_this_month() {
        let today = date(2026, 8, 29);
        assert_eq!(
            resolve_period("this_month", today),
            DateRange::new(date(2026, 8, 1), today)
        );
    }

    #[test]
    fn test_last_month() {
        let today = date(2026, 3, 15);
        assert_eq!(
            resolve_period("last_month", today),
            DateRange::new(date(2026, 2, 1), date(2026, 2, 28))
        );
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        let today = date(2026, 1, 10);
        assert_eq!(
            resolve_period("last_month", today),
            DateRange::new(date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_this_year() {
        let today = date(2026, 8, 29);
        assert_eq!(
            resolve_period("this_year", today),
            DateRange::new(date(2026, 1, 1), today)
        );
    }

    #[test]
    fn test_unrecognized_name_falls_back_to_this_month() {
        let today = date(2026, 8, 29);
        assert_eq!(
            resolve_period("fortnight", today),
            resolve_period("this_month", today)
        );
    }

    #[test]
    fn test_start_never_after_end() {
        let names = [
            "today",
            "yesterday",
            "this_week",
            "this_month",
            "last_month",
            "this_year",
            "bogus",
        ];
        for today in [date(2026, 1, 1), date(2026, 2, 28), date(2026, 12, 31)] {
            for name in names {
                let range = resolve_period(name, today);
                assert!(range.start <= range.end, "{name} on {today}");
            }
        }
    }
}
