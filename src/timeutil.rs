//! Local time handling
//!
//! All window boundaries in the engine are fixed local wall-clock times
//! ("06:00", noon, "14:00") on the target date, converted to UTC instants
//! in the caller-supplied IANA timezone before querying the store. A "day"
//! is local midnight to local midnight, so day lengths vary across DST
//! transitions.

use crate::error::EngineError;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Parse an IANA timezone name ("Europe/London", "America/New_York")
pub fn parse_timezone(name: &str) -> Result<Tz, EngineError> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// UTC instant of a local wall-clock time on a date.
///
/// Ambiguous local times (clocks rolled back) resolve to the earlier
/// instant; times skipped by a DST gap resolve forward to the next valid
/// wall-clock time.
pub fn instant_at(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let mut local = date.and_time(time);
    loop {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earlier, _) => return earlier.with_timezone(&Utc),
            LocalResult::None => local += Duration::minutes(30),
        }
    }
}

/// `[start, end)` UTC bounds of the local calendar day
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(NaiveDate::MAX);
    (
        instant_at(date, NaiveTime::MIN, tz),
        instant_at(next, NaiveTime::MIN, tz),
    )
}

/// Whether an instant falls exactly at local midnight
pub fn is_local_midnight(ts: DateTime<Utc>, tz: Tz) -> bool {
    ts.with_timezone(&tz).time() == NaiveTime::MIN
}

/// Local 12-hour clock label for an instant ("07:15 AM")
pub fn local_time_label(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%I:%M %p").to_string()
}

/// How a caller names the span of days to compute over.
///
/// Callers may send either an explicit date pair or a `days=N` count; the
/// ambiguity is resolved in one place by [`DateRange::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Explicit { start: NaiveDate, end: NaiveDate },
    LastNDays(u32),
}

impl DateRange {
    /// Resolve to inclusive `(start, end)` calendar bounds.
    ///
    /// `LastNDays(n)` covers the `n` days ending at `today`.
    pub fn resolve(self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), EngineError> {
        match self {
            DateRange::Explicit { start, end } => {
                if start > end {
                    return Err(EngineError::InvalidDateRange(format!(
                        "start {start} is after end {end}"
                    )));
                }
                Ok((start, end))
            }
            DateRange::LastNDays(n) => {
                if n == 0 {
                    return Err(EngineError::InvalidDateRange(
                        "day count must be positive".to_string(),
                    ));
                }
                let start = today - Duration::days(i64::from(n) - 1);
                Ok((start, today))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_bounds_are_24h_outside_dst_transitions() {
        let tz: Tz = "Europe/London".parse().unwrap();
        let (start, end) = day_bounds(date(2025, 1, 28), tz);
        assert_eq!(end - start, Duration::hours(24));
        // London is UTC in January
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn spring_forward_day_is_23h() {
        let tz: Tz = "Europe/London".parse().unwrap();
        let (start, end) = day_bounds(date(2025, 3, 30), tz);
        assert_eq!(end - start, Duration::hours(23));
    }

    #[test]
    fn fall_back_day_is_25h() {
        let tz: Tz = "Europe/London".parse().unwrap();
        let (start, end) = day_bounds(date(2025, 10, 26), tz);
        assert_eq!(end - start, Duration::hours(25));
    }

    #[test]
    fn gap_time_resolves_forward() {
        let tz: Tz = "Europe/London".parse().unwrap();
        // 01:30 local does not exist on 2025-03-30 (clocks jump 01:00 -> 02:00)
        let instant = instant_at(date(2025, 3, 30), NaiveTime::from_hms_opt(1, 30, 0).unwrap(), tz);
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap());
    }

    #[test]
    fn invalid_timezone_is_an_error() {
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(EngineError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn last_n_days_resolution() {
        let today = date(2025, 1, 30);
        let (start, end) = DateRange::LastNDays(30).resolve(today).unwrap();
        assert_eq!(start, date(2025, 1, 1));
        assert_eq!(end, today);

        let (start, end) = DateRange::LastNDays(1).resolve(today).unwrap();
        assert_eq!(start, today);
        assert_eq!(end, today);
    }

    #[test]
    fn explicit_range_validation() {
        let ok = DateRange::Explicit {
            start: date(2025, 1, 1),
            end: date(2025, 1, 31),
        };
        assert!(ok.resolve(date(2025, 2, 1)).is_ok());

        let bad = DateRange::Explicit {
            start: date(2025, 2, 2),
            end: date(2025, 2, 1),
        };
        assert!(matches!(
            bad.resolve(date(2025, 2, 1)),
            Err(EngineError::InvalidDateRange(_))
        ));
        assert!(DateRange::LastNDays(0).resolve(date(2025, 2, 1)).is_err());
    }

    #[test]
    fn midnight_detection_uses_local_clock() {
        let tz: Tz = "America/New_York".parse().unwrap();
        // 05:00 UTC is local midnight in January (UTC-5)
        let ts = Utc.with_ymd_and_hms(2025, 1, 28, 5, 0, 0).unwrap();
        assert!(is_local_midnight(ts, tz));
        assert!(!is_local_midnight(ts + Duration::minutes(15), tz));
    }

    #[test]
    fn time_labels_are_12_hour() {
        let tz: Tz = "Europe/London".parse().unwrap();
        let ts = Utc.with_ymd_and_hms(2025, 1, 28, 7, 15, 0).unwrap();
        assert_eq!(local_time_label(ts, tz), "07:15 AM");
        let ts = Utc.with_ymd_and_hms(2025, 1, 28, 14, 0, 0).unwrap();
        assert_eq!(local_time_label(ts, tz), "02:00 PM");
    }
}
