//! Recurring checkup model.
//!
//! # Responsibility
//! - Track when a checkup was last completed and how often it recurs.
//! - Answer whether the checkup is due for a caller-supplied "now".
//!
//! # Invariants
//! - `interval_months` always stays within `1..=12`, including after decode.
//! - `is_due` is derived on every call and never cached.

use crate::model::time_span::{add_months, start_of_month, TimeSpan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_INTERVAL_MONTHS: u32 = 1;
pub const MAX_INTERVAL_MONTHS: u32 = 12;
pub const DEFAULT_INTERVAL_MONTHS: u32 = 1;

/// Recurring review cycle with a monthly interval.
///
/// Serialized as `{"lastCheckupDate": <RFC 3339>, "intervalMonths": <int>}`.
/// A missing `intervalMonths` decodes as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkup {
    last_checkup_date: DateTime<Utc>,
    #[serde(
        default = "default_interval_months",
        deserialize_with = "deserialize_interval_months"
    )]
    interval_months: u32,
}

impl Checkup {
    /// Creates a checkup; `interval_months` is clamped to `1..=12`.
    pub fn new(last_checkup_date: DateTime<Utc>, interval_months: u32) -> Self {
        Self {
            last_checkup_date,
            interval_months: clamp_interval(interval_months),
        }
    }

    /// Default checkup used when nothing is persisted yet: the first day of the
    /// month containing `now`, recurring monthly.
    pub fn starting_month_of(now: DateTime<Utc>) -> Self {
        Self::new(start_of_month(now), DEFAULT_INTERVAL_MONTHS)
    }

    pub fn last_checkup_date(&self) -> DateTime<Utc> {
        self.last_checkup_date
    }

    pub fn interval_months(&self) -> u32 {
        self.interval_months
    }

    /// Records a completed checkup. Callable whether or not it was due.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.last_checkup_date = now;
    }

    /// Changes the interval, clamped to `1..=12`. Returns the stored value.
    pub fn set_interval(&mut self, months: u32) -> u32 {
        self.interval_months = clamp_interval(months);
        self.interval_months
    }

    /// Whole calendar months elapsed since the last completion.
    pub fn months_since(&self, now: DateTime<Utc>) -> u32 {
        TimeSpan::between(self.last_checkup_date, now).total_months()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.months_since(now) >= self.interval_months
    }

    /// Date at which the checkup becomes due.
    pub fn next_due_date(&self) -> DateTime<Utc> {
        add_months(self.last_checkup_date, self.interval_months).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn clamp_interval(months: u32) -> u32 {
    months.clamp(MIN_INTERVAL_MONTHS, MAX_INTERVAL_MONTHS)
}

fn default_interval_months() -> u32 {
    DEFAULT_INTERVAL_MONTHS
}

fn deserialize_interval_months<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let clamped = raw.clamp(
        i64::from(MIN_INTERVAL_MONTHS),
        i64::from(MAX_INTERVAL_MONTHS),
    );
    Ok(u32::try_from(clamped).unwrap_or(DEFAULT_INTERVAL_MONTHS))
}

#[cfg(test)]
mod tests {
    use super::Checkup;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap()
    }

    #[test]
    fn default_starts_on_first_of_current_month() {
        let checkup = Checkup::starting_month_of(at(2025, 2, 21));
        assert_eq!(
            checkup.last_checkup_date(),
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(checkup.interval_months(), 1);
    }

    #[test]
    fn due_after_interval_and_not_before() {
        let mut checkup = Checkup::new(at(2025, 1, 15), 1);
        assert!(!checkup.is_due(at(2025, 2, 14)));
        assert!(checkup.is_due(at(2025, 2, 15)));

        checkup.complete(at(2025, 2, 15));
        assert!(!checkup.is_due(at(2025, 2, 15)));
        assert!(checkup.is_due(at(2025, 3, 15)));
    }

    #[test]
    fn longer_interval_postpones_due() {
        let now = at(2025, 6, 10);
        let mut checkup = Checkup::new(at(2025, 4, 10), 1);
        assert!(checkup.is_due(now));

        checkup.set_interval(3);
        assert!(!checkup.is_due(now));
        assert!(checkup.is_due(at(2025, 7, 10)));
    }

    #[test]
    fn complete_resets_due_regardless_of_interval() {
        let now = at(2026, 1, 1);
        for interval in 1..=12 {
            let mut checkup = Checkup::new(at(2020, 1, 1), interval);
            assert!(checkup.is_due(now));
            checkup.complete(now);
            checkup.complete(now);
            assert!(!checkup.is_due(now));
            assert!(!checkup.is_due(now + Duration::days(27)));
        }
    }

    #[test]
    fn interval_is_clamped() {
        let mut checkup = Checkup::new(at(2025, 1, 1), 0);
        assert_eq!(checkup.interval_months(), 1);
        assert_eq!(checkup.set_interval(13), 12);
        assert_eq!(checkup.set_interval(0), 1);
        assert_eq!(checkup.set_interval(6), 6);
    }

    #[test]
    fn clock_behind_last_checkup_is_not_due() {
        let checkup = Checkup::new(at(2025, 5, 1), 1);
        assert!(!checkup.is_due(at(2024, 1, 1)));
        assert_eq!(checkup.months_since(at(2024, 1, 1)), 0);
    }

    #[test]
    fn next_due_date_adds_interval_months() {
        let checkup = Checkup::new(at(2025, 1, 31), 1);
        assert_eq!(checkup.next_due_date(), at(2025, 2, 28));

        let quarterly = Checkup::new(at(2025, 11, 5), 3);
        assert_eq!(quarterly.next_due_date(), at(2026, 2, 5));
    }

    #[test]
    fn decode_defaults_and_clamps_interval() {
        let missing: Checkup =
            serde_json::from_str(r#"{"lastCheckupDate":"2025-03-01T00:00:00Z"}"#).unwrap();
        assert_eq!(missing.interval_months(), 1);

        let too_large: Checkup = serde_json::from_str(
            r#"{"lastCheckupDate":"2025-03-01T00:00:00Z","intervalMonths":40}"#,
        )
        .unwrap();
        assert_eq!(too_large.interval_months(), 12);

        let negative: Checkup = serde_json::from_str(
            r#"{"lastCheckupDate":"2025-03-01T00:00:00Z","intervalMonths":-2}"#,
        )
        .unwrap();
        assert_eq!(negative.interval_months(), 1);
    }
}
