//! Daytime heart rate feature extraction

use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::stats;
use crate::store::SampleStore;
use crate::timeutil::{day_bounds, instant_at};
use crate::types::{FeatureSet, RawSample, SignalKind};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

/// Derive heart rate features over the full local day.
///
/// Samples with values at or below zero are dropped before any statistic.
pub fn heart_rate_features<S: SampleStore>(
    store: &S,
    config: &EngineConfig,
    date: NaiveDate,
    tz: Tz,
) -> Result<FeatureSet, StoreError> {
    let mut features = FeatureSet::new();

    let (day_start, day_end) = day_bounds(date, tz);
    let samples = store.get_samples(SignalKind::HeartRate, day_start, day_end)?;
    let valid: Vec<RawSample> = samples.into_iter().filter(|s| s.value > 0.0).collect();
    if valid.is_empty() {
        return Ok(features);
    }

    let max = valid.iter().map(|s| s.value).fold(f64::NEG_INFINITY, f64::max);
    features.insert("hr_max_24h".into(), (max.round() as i64).into());

    let local = |hour| instant_at(date, NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN), tz);
    let windows = [
        ("hr_morning_avg", config.morning_start_hour, config.noon_hour),
        ("hr_afternoon_avg", config.noon_hour, config.afternoon_end_hour),
        ("hr_2pm_window", config.midday_start_hour, config.midday_end_hour),
    ];
    for (name, start_hour, end_hour) in windows {
        if let Some(avg) = window_avg(&valid, local(start_hour), local(end_hour)) {
            features.insert(name.into(), avg.into());
        }
    }

    // Lowest mean over a sliding pair of consecutive samples. This
    // approximates a 30-minute rolling minimum at the assumed ~15-minute
    // native sampling interval; with irregular sampling the window spans
    // whatever time the two samples cover.
    let window = config.resting_hr_window_samples.max(1);
    if valid.len() >= window.max(2) {
        let resting = valid
            .windows(window)
            .filter_map(|pair| stats::mean(&pair.iter().map(|s| s.value).collect::<Vec<_>>()))
            .fold(f64::INFINITY, f64::min);
        if resting.is_finite() {
            features.insert("resting_hr".into(), (resting.round() as i64).into());
        }
    }

    Ok(features)
}

fn window_avg(valid: &[RawSample], start: DateTime<Utc>, end: DateTime<Utc>) -> Option<f64> {
    let values: Vec<f64> = valid
        .iter()
        .filter(|s| s.timestamp >= start && s.timestamp < end)
        .map(|s| s.value)
        .collect();
    stats::mean(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const TZ: &str = "Europe/London";

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 28).unwrap()
    }

    fn tz() -> Tz {
        TZ.parse().unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 28, hour, minute, 0).unwrap()
    }

    fn add_hr(store: &mut MemoryStore, hour: u32, minute: u32, hr: f64) {
        store.add_sample(SignalKind::HeartRate, RawSample::new(at(hour, minute), hr));
    }

    #[test]
    fn empty_without_samples() {
        let store = MemoryStore::new();
        let features = heart_rate_features(&store, &EngineConfig::default(), day(), tz()).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn empty_when_only_invalid_samples() {
        let mut store = MemoryStore::new();
        add_hr(&mut store, 10, 0, 0.0);
        add_hr(&mut store, 11, 0, -1.0);

        let features = heart_rate_features(&store, &EngineConfig::default(), day(), tz()).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn window_averages_and_daily_max() {
        let mut store = MemoryStore::new();
        // Morning: 7am, 8am, 9am (London is UTC in January)
        for (hour, hr) in [(7, 60.0), (8, 65.0), (9, 62.0)] {
            add_hr(&mut store, hour, 0, hr);
        }
        // Afternoon, all inside the 1pm-4pm midday window
        for (hour, hr) in [(13, 75.0), (14, 72.0), (15, 78.0)] {
            add_hr(&mut store, hour, 0, hr);
        }

        let features = heart_rate_features(&store, &EngineConfig::default(), day(), tz()).unwrap();
        let morning = features["hr_morning_avg"].as_f64().unwrap();
        assert!((morning - (60.0 + 65.0 + 62.0) / 3.0).abs() < 0.01);
        let afternoon = features["hr_afternoon_avg"].as_f64().unwrap();
        assert!((afternoon - 75.0).abs() < 0.01);
        let midday = features["hr_2pm_window"].as_f64().unwrap();
        assert!((midday - 75.0).abs() < 0.01);
        assert_eq!(features["hr_max_24h"].as_f64(), Some(78.0));
    }

    #[test]
    fn zero_values_excluded_from_window_averages() {
        let mut store = MemoryStore::new();
        add_hr(&mut store, 10, 0, 0.0);
        add_hr(&mut store, 11, 0, 65.0);

        let features = heart_rate_features(&store, &EngineConfig::default(), day(), tz()).unwrap();
        assert_eq!(features["hr_morning_avg"].as_f64(), Some(65.0));
    }

    #[test]
    fn resting_hr_is_lowest_pair_mean() {
        let mut store = MemoryStore::new();
        // Pair means: 71, 62.5, 57.5, 61 -> min 57.5 -> rounds to 58
        for (i, hr) in [80.0, 62.0, 63.0, 52.0, 70.0].iter().enumerate() {
            let ts = at(8, 0) + chrono::Duration::minutes(i as i64 * 15);
            store.add_sample(SignalKind::HeartRate, RawSample::new(ts, *hr));
        }

        let features = heart_rate_features(&store, &EngineConfig::default(), day(), tz()).unwrap();
        assert_eq!(features["resting_hr"].as_f64(), Some(58.0));
    }

    #[test]
    fn no_resting_hr_with_single_sample() {
        let mut store = MemoryStore::new();
        add_hr(&mut store, 8, 0, 60.0);

        let features = heart_rate_features(&store, &EngineConfig::default(), day(), tz()).unwrap();
        assert!(!features.contains_key("resting_hr"));
        assert_eq!(features["hr_max_24h"].as_f64(), Some(60.0));
    }
}
