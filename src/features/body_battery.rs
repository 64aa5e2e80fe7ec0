//! Body battery feature extraction
//!
//! Body battery arrives sparsely (a handful of samples per day) and the
//! vendor backfills a placeholder reading at local midnight. Placeholders
//! are excluded from the per-sample list and from every window or
//! nearest-sample pick; only the daily minimum sees them.

use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::store::SampleStore;
use crate::timeutil::{day_bounds, instant_at, is_local_midnight, local_time_label};
use crate::types::{BodyBatteryPoint, FeatureSet, RawSample, SignalKind};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

/// Fixed local clock times surfaced as point-in-time features
const CLOCK_LOOKUPS: [(u32, &str); 4] = [
    (9, "bb_9am"),
    (12, "bb_12pm"),
    (14, "bb_2pm"),
    (18, "bb_6pm"),
];

/// Derive body battery features for the local day, plus the display-ready
/// sample list.
pub fn body_battery_features<S: SampleStore>(
    store: &S,
    config: &EngineConfig,
    date: NaiveDate,
    tz: Tz,
) -> Result<(FeatureSet, Vec<BodyBatteryPoint>), StoreError> {
    let mut features = FeatureSet::new();

    let (day_start, day_end) = day_bounds(date, tz);
    let samples = store.get_samples(SignalKind::BodyBattery, day_start, day_end)?;
    if samples.is_empty() {
        return Ok((features, Vec::new()));
    }

    // Daily minimum is the one statistic that keeps midnight placeholders
    let min = samples.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
    features.insert("bb_daily_min".into(), (min.round() as i64).into());

    let kept: Vec<RawSample> = samples
        .into_iter()
        .filter(|s| !is_local_midnight(s.timestamp, tz))
        .collect();

    let lookup_window = Duration::minutes(config.clock_lookup_window_min);

    if let Some(session) = store.get_sleep_session(date)? {
        if let Some(sleep_end) = session.sleep_end {
            if let Some(value) = closest_within(&kept, sleep_end, lookup_window) {
                features.insert("bb_wakeup".into(), (value.round() as i64).into());
            }
        }
    }

    for (hour, name) in CLOCK_LOOKUPS {
        let target = instant_at(
            date,
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN),
            tz,
        );
        if let Some(value) = closest_within(&kept, target, lookup_window) {
            features.insert(name.into(), (value.round() as i64).into());
        }
    }

    // Drain rates: split at local noon, rate from each group's first and
    // last sample. Both halves must have data.
    let noon = instant_at(
        date,
        NaiveTime::from_hms_opt(config.noon_hour, 0, 0).unwrap_or(NaiveTime::MIN),
        tz,
    );
    let morning: Vec<&RawSample> = kept.iter().filter(|s| s.timestamp < noon).collect();
    let afternoon: Vec<&RawSample> = kept.iter().filter(|s| s.timestamp >= noon).collect();
    if !morning.is_empty() && !afternoon.is_empty() {
        if let Some(rate) = drain_rate(&morning) {
            features.insert("bb_morning_drain_rate".into(), rate.into());
        }
        if let Some(rate) = drain_rate(&afternoon) {
            features.insert("bb_afternoon_drain_rate".into(), rate.into());
        }
    }

    let points = kept
        .iter()
        .map(|s| BodyBatteryPoint {
            time: local_time_label(s.timestamp, tz),
            value: s.value.round() as i64,
        })
        .collect();

    Ok((features, points))
}

/// Points-per-hour change between a group's first and last sample.
/// `None` when the samples span no time.
fn drain_rate(group: &[&RawSample]) -> Option<f64> {
    let first = group.first()?;
    let last = group.last()?;
    let hours = (last.timestamp - first.timestamp).num_seconds() as f64 / 3600.0;
    if hours <= 0.0 {
        return None;
    }
    Some((last.value - first.value) / hours)
}

/// Value of the sample nearest to `target`, if within `window`.
/// Ties keep the earlier sample.
fn closest_within(
    samples: &[RawSample],
    target: DateTime<Utc>,
    window: Duration,
) -> Option<f64> {
    let mut best: Option<(Duration, f64)> = None;
    for sample in samples {
        let delta = (sample.timestamp - target).abs();
        if delta > window {
            continue;
        }
        if best.map_or(true, |(best_delta, _)| delta < best_delta) {
            best = Some((delta, sample.value));
        }
    }
    best.map(|(_, value)| value)
}
