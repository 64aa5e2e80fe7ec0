//! Overnight HRV feature extraction

use crate::error::StoreError;
use crate::stats;
use crate::store::SampleStore;
use crate::types::{FeatureSet, SignalKind};
use chrono::NaiveDate;

/// Minimum overnight samples needed to fit a slope
const MIN_SLOPE_SAMPLES: usize = 3;

/// Derive HRV features from readings inside the overnight window.
///
/// Requires a sleep session with both bounds; the slope is fit against the
/// sample index, not wall-clock time, and is omitted with fewer than three
/// readings.
pub fn hrv_features<S: SampleStore>(store: &S, date: NaiveDate) -> Result<FeatureSet, StoreError> {
    let mut features = FeatureSet::new();

    let session = match store.get_sleep_session(date)? {
        Some(session) => session,
        None => return Ok(features),
    };
    let (start, end) = match (session.sleep_start, session.sleep_end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Ok(features),
    };

    let samples = store.get_samples(SignalKind::Hrv, start, end)?;
    if samples.is_empty() {
        return Ok(features);
    }
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

    if let Some(avg) = stats::mean(&values) {
        features.insert("hrv_overnight_avg".into(), avg.into());
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    features.insert("hrv_overnight_min".into(), min.into());

    if values.len() >= MIN_SLOPE_SAMPLES {
        if let Some(slope) = stats::linear_slope(&values) {
            features.insert("hrv_rmssd_slope".into(), slope.into());
        }
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{RawSample, SleepSession};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 28).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 28, hour, 0, 0).unwrap()
    }

    fn store_with_sleep() -> MemoryStore {
        let mut store = MemoryStore::new();
        let mut session = SleepSession::new(day());
        session.sleep_start = Some(at(0));
        session.sleep_end = Some(at(7));
        session.total_sleep_seconds = Some(7 * 3600);
        store.add_sleep_session(session);
        store
    }

    #[test]
    fn empty_without_sleep_session() {
        let store = MemoryStore::new();
        assert!(hrv_features(&store, day()).unwrap().is_empty());
    }

    #[test]
    fn empty_without_overnight_samples() {
        let store = store_with_sleep();
        assert!(hrv_features(&store, day()).unwrap().is_empty());
    }

    #[test]
    fn computes_overnight_avg_min_and_slope() {
        let mut store = store_with_sleep();
        for (hour, value) in [(1, 45.0), (2, 50.0), (3, 55.0), (4, 48.0), (5, 52.0)] {
            store.add_sample(SignalKind::Hrv, RawSample::new(at(hour), value));
        }

        let features = hrv_features(&store, day()).unwrap();
        assert_eq!(features["hrv_overnight_avg"].as_f64(), Some(50.0));
        assert_eq!(features["hrv_overnight_min"].as_f64(), Some(45.0));
        assert!(features.contains_key("hrv_rmssd_slope"));
    }

    #[test]
    fn no_slope_with_fewer_than_three_samples() {
        let mut store = store_with_sleep();
        store.add_sample(SignalKind::Hrv, RawSample::new(at(1), 45.0));
        store.add_sample(SignalKind::Hrv, RawSample::new(at(3), 55.0));

        let features = hrv_features(&store, day()).unwrap();
        assert!(features.contains_key("hrv_overnight_avg"));
        assert!(!features.contains_key("hrv_rmssd_slope"));
    }

    #[test]
    fn samples_outside_window_are_ignored() {
        let mut store = store_with_sleep();
        // Exactly at sleep_end: half-open window excludes it
        store.add_sample(SignalKind::Hrv, RawSample::new(at(7), 90.0));
        store.add_sample(SignalKind::Hrv, RawSample::new(at(2), 40.0));

        let features = hrv_features(&store, day()).unwrap();
        assert_eq!(features["hrv_overnight_avg"].as_f64(), Some(40.0));
    }
}
