//! Stress feature extraction
//!
//! The vendor stream encodes "could not measure" as a non-positive value;
//! those sentinels are dropped before any statistic.

use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::stats;
use crate::store::SampleStore;
use crate::timeutil::{day_bounds, instant_at};
use crate::types::{FeatureSet, RawSample, SignalKind};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

/// Derive stress features over the full local day.
pub fn stress_features<S: SampleStore>(
    store: &S,
    config: &EngineConfig,
    date: NaiveDate,
    tz: Tz,
) -> Result<FeatureSet, StoreError> {
    let mut features = FeatureSet::new();

    let (day_start, day_end) = day_bounds(date, tz);
    let samples = store.get_samples(SignalKind::Stress, day_start, day_end)?;
    let valid: Vec<RawSample> = samples.into_iter().filter(|s| s.value > 0.0).collect();
    if valid.is_empty() {
        return Ok(features);
    }

    let local = |hour| instant_at(date, NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN), tz);
    let windows = [
        ("stress_morning_avg", config.morning_start_hour, config.noon_hour),
        ("stress_afternoon_avg", config.noon_hour, config.afternoon_end_hour),
        ("stress_2pm_window", config.midday_start_hour, config.midday_end_hour),
    ];
    for (name, start_hour, end_hour) in windows {
        if let Some(avg) = window_avg(&valid, local(start_hour), local(end_hour)) {
            features.insert(name.into(), avg.into());
        }
    }

    let peak = valid.iter().map(|s| s.value).fold(f64::NEG_INFINITY, f64::max);
    features.insert("stress_peak".into(), (peak.round() as i64).into());

    // Each reading stands in for one sampling interval of elapsed time
    let high = valid
        .iter()
        .filter(|s| s.value > config.high_stress_threshold)
        .count() as i64;
    features.insert(
        "high_stress_minutes".into(),
        (high * config.stress_sample_interval_min).into(),
    );

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

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 28).unwrap()
    }

    fn tz() -> Tz {
        "Europe/London".parse().unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 28, hour, minute, 0).unwrap()
    }

    fn add_stress(store: &mut MemoryStore, hour: u32, minute: u32, value: f64) {
        store.add_sample(SignalKind::Stress, RawSample::new(at(hour, minute), value));
    }

    fn compute(store: &MemoryStore) -> FeatureSet {
        stress_features(store, &EngineConfig::default(), day(), tz()).unwrap()
    }

    #[test]
    fn empty_without_samples() {
        let store = MemoryStore::new();
        assert!(compute(&store).is_empty());
    }

    #[test]
    fn empty_when_only_sentinels() {
        let mut store = MemoryStore::new();
        add_stress(&mut store, 9, 0, -1.0);
        add_stress(&mut store, 10, 0, 0.0);
        add_stress(&mut store, 11, 0, -2.0);

        assert!(compute(&store).is_empty());
    }

    #[test]
    fn window_averages_exclude_sentinels() {
        let mut store = MemoryStore::new();
        add_stress(&mut store, 8, 0, -1.0);
        add_stress(&mut store, 9, 0, 30.0);
        add_stress(&mut store, 10, 0, 40.0);
        add_stress(&mut store, 14, 0, 55.0);

        let features = compute(&store);
        assert_eq!(features["stress_morning_avg"].as_f64(), Some(35.0));
        assert_eq!(features["stress_afternoon_avg"].as_f64(), Some(55.0));
        assert_eq!(features["stress_2pm_window"].as_f64(), Some(55.0));
        assert_eq!(features["stress_peak"].as_f64(), Some(55.0));
    }

    #[test]
    fn high_stress_minutes_scale_by_sampling_interval() {
        let mut store = MemoryStore::new();
        // Three readings above 60, one exactly at the threshold
        add_stress(&mut store, 9, 0, 61.0);
        add_stress(&mut store, 9, 15, 60.0);
        add_stress(&mut store, 9, 30, 75.0);
        add_stress(&mut store, 9, 45, 80.0);

        let features = compute(&store);
        assert_eq!(features["high_stress_minutes"].as_f64(), Some(45.0));
    }
}
