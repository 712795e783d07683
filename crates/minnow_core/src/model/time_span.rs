//! Calendar-aware elapsed time between two instants.
//!
//! # Responsibility
//! - Decompose an elapsed interval into whole years, months and days.
//! - Provide the month arithmetic shared by checkups and items.
//!
//! # Invariants
//! - Results are never negative; a reversed range yields `TimeSpan::ZERO`.
//! - Month addition clamps the day to the last day of the target month.
//! - Adding `years`, then `months`, then `days` to `start` (each step
//!   calendar-aware) lands within one day of `end`, exactly on it when both
//!   share a time of day.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Elapsed calendar time as `(years, months, days)`.
///
/// Values are recomputed on every read because they depend on "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan {
        years: 0,
        months: 0,
        days: 0,
    };

    /// Computes the calendar decomposition of `start..end`.
    ///
    /// Adds the largest number of whole years that fits, then the largest
    /// number of whole months (at most 11) from that anchor, then counts the
    /// remaining whole days.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end <= start {
            return Self::ZERO;
        }

        let year_bound = month_distance_upper_bound(start, end) / 12;
        let (years, year_anchor) = last_fitting_step(start, end, year_bound, 12);

        let month_bound = month_distance_upper_bound(year_anchor, end).min(11);
        let (months, month_anchor) = last_fitting_step(year_anchor, end, month_bound, 1);

        let days = (end - month_anchor).num_days().max(0);
        Self {
            years,
            months,
            days: u32::try_from(days).unwrap_or(u32::MAX),
        }
    }

    /// Years and months folded into a single month count.
    pub fn total_months(&self) -> u32 {
        self.years.saturating_mul(12).saturating_add(self.months)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Card text, e.g. `7y 2m`. Days are left out on purpose.
impl Display for TimeSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}y {}m", self.years, self.months)
    }
}

/// Adds calendar months, clamping the day to the end of the target month.
pub fn add_months(instant: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    instant.checked_add_months(Months::new(months))
}

/// Midnight UTC on the first day of the month containing `instant`.
pub fn start_of_month(instant: DateTime<Utc>) -> DateTime<Utc> {
    month_start(instant.year(), instant.month()).unwrap_or(instant)
}

/// Midnight UTC on the first day of `year`/`month`.
///
/// Returns `None` when `month` is outside `1..=12` or the year is out of range.
pub fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Largest `count <= bound` with `from + count * step months <= end`, and the
/// instant it lands on.
fn last_fitting_step(
    from: DateTime<Utc>,
    end: DateTime<Utc>,
    bound: u32,
    step: u32,
) -> (u32, DateTime<Utc>) {
    let mut count = bound;
    while count > 0 {
        match add_months(from, count.saturating_mul(step)) {
            Some(anchor) if anchor <= end => return (count, anchor),
            _ => count -= 1,
        }
    }
    (0, from)
}

fn month_distance_upper_bound(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    u32::try_from((years * 12 + months).max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{add_months, month_start, start_of_month, TimeSpan};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn between_splits_years_months_and_days() {
        let span = TimeSpan::between(at(2018, 3, 10), at(2025, 5, 14));
        assert_eq!(
            span,
            TimeSpan {
                years: 7,
                months: 2,
                days: 4
            }
        );
        assert_eq!(span.total_months(), 86);
    }

    #[test]
    fn between_does_not_count_unfinished_month() {
        let span = TimeSpan::between(at(2025, 1, 20), at(2025, 3, 19));
        assert_eq!(span.years, 0);
        assert_eq!(span.months, 1);
        assert_eq!(span.days, 27);
    }

    #[test]
    fn between_respects_time_of_day() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        let span = TimeSpan::between(start, end);
        assert_eq!(span.months, 0);
        assert_eq!(span.days, 30);
    }

    #[test]
    fn between_clamps_month_end() {
        // Jan 31 + 1 month lands on Feb 28 in a common year.
        let span = TimeSpan::between(at(2025, 1, 31), at(2025, 3, 1));
        assert_eq!(span.months, 1);
        assert_eq!(span.days, 1);
    }

    #[test]
    fn reversed_range_clamps_to_zero() {
        let span = TimeSpan::between(at(2025, 6, 1), at(2024, 1, 1));
        assert!(span.is_zero());
        assert!(TimeSpan::between(at(2025, 6, 1), at(2025, 6, 1)).is_zero());
    }

    fn recompose(start: DateTime<Utc>, span: TimeSpan) -> DateTime<Utc> {
        let after_years = add_months(start, span.years * 12).unwrap();
        let after_months = add_months(after_years, span.months).unwrap();
        after_months + Duration::days(i64::from(span.days))
    }

    #[test]
    fn decomposition_recomposes_to_end() {
        let starts = [at(2019, 1, 31), at(2020, 2, 29), at(2023, 7, 15), at(2024, 12, 1)];
        for start in starts {
            for offset_days in 0..1200 {
                let end = start + Duration::days(offset_days);
                let span = TimeSpan::between(start, end);
                assert_eq!(recompose(start, span), end, "{start} + {span:?}");
                assert!(span.months < 12);

                let later = end + Duration::hours(5);
                let span = TimeSpan::between(start, later);
                let recomposed = recompose(start, span);
                assert!(recomposed <= later, "{start} + {span:?} overshoots {later}");
                assert!(
                    recomposed + Duration::days(1) > later,
                    "{start} + {span:?} leaves a whole day before {later}"
                );
            }
        }
    }

    #[test]
    fn leap_day_start_adds_years_before_months() {
        let start = at(2020, 2, 29);
        let end = at(2021, 3, 29);
        let span = TimeSpan::between(start, end);
        assert_eq!(
            span,
            TimeSpan {
                years: 1,
                months: 1,
                days: 1
            }
        );
        assert_eq!(recompose(start, span), end);
    }

    #[test]
    fn clamped_year_anchor_keeps_months_below_twelve() {
        let start = at(2020, 2, 29);
        let end = at(2024, 2, 28) + Duration::hours(12);
        let span = TimeSpan::between(start, end);
        assert_eq!(span.years, 3);
        assert_eq!(span.months, 11);
        assert_eq!(span.days, 31);
    }

    #[test]
    fn display_omits_days() {
        let span = TimeSpan {
            years: 3,
            months: 0,
            days: 12,
        };
        assert_eq!(span.to_string(), "3y 0m");
        assert_eq!(TimeSpan::ZERO.to_string(), "0y 0m");
    }

    #[test]
    fn start_of_month_truncates_to_midnight_on_the_first() {
        let instant = Utc.with_ymd_and_hms(2025, 2, 21, 17, 42, 9).unwrap();
        assert_eq!(start_of_month(instant), at(2025, 2, 1));
        assert_eq!(month_start(2024, 13), None);
        assert_eq!(month_start(2024, 0), None);
    }
}
