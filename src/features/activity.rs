//! Steps and training activity feature extraction

use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::store::SampleStore;
use crate::timeutil::{day_bounds, instant_at};
use crate::types::{Activity, FeatureSet, SignalKind};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

/// Derive step totals and training features for the local day.
///
/// A day with neither step samples nor activities yields the empty set; a
/// day with steps but no activities still reports `had_training = false`.
pub fn activity_features<S: SampleStore>(
    store: &S,
    config: &EngineConfig,
    date: NaiveDate,
    tz: Tz,
) -> Result<FeatureSet, StoreError> {
    let mut features = FeatureSet::new();

    let (day_start, day_end) = day_bounds(date, tz);
    let steps = store.get_samples(SignalKind::Steps, day_start, day_end)?;
    let activities = store.get_activities(day_start, day_end)?;
    if steps.is_empty() && activities.is_empty() {
        return Ok(features);
    }

    let local = |hour| instant_at(date, NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN), tz);

    if !steps.is_empty() {
        let noon = local(config.noon_hour);
        let total: f64 = steps.iter().map(|s| s.value).sum();
        let morning: f64 = steps
            .iter()
            .filter(|s| s.timestamp < noon)
            .map(|s| s.value)
            .sum();
        features.insert("steps_total".into(), (total.round() as i64).into());
        features.insert("steps_morning".into(), (morning.round() as i64).into());
    }

    features.insert("had_training".into(), (!activities.is_empty()).into());
    let main = match main_activity(&activities) {
        Some(main) => main,
        None => return Ok(features),
    };

    features.insert("training_type".into(), main.activity_type.clone().into());
    if let Some(duration) = main.duration_seconds {
        features.insert(
            "training_duration_min".into(),
            (duration as f64 / 60.0).into(),
        );
    }
    if let Some(avg_hr) = main.avg_hr {
        features.insert("training_avg_hr".into(), avg_hr.into());
        features.insert(
            "training_intensity".into(),
            intensity_label(avg_hr as f64, config).into(),
        );
    }

    let reference = local(config.afternoon_reference_hour);
    let hours = (reference - main.end_time).num_seconds() as f64 / 3600.0;
    features.insert("hours_since_training".into(), hours.into());

    Ok(features)
}

/// The activity with the highest average heart rate; ties keep the earlier
/// entry, and activities with no heart rate sort below any with one.
fn main_activity(activities: &[Activity]) -> Option<&Activity> {
    let mut best: Option<&Activity> = None;
    for activity in activities {
        let hr = activity.avg_hr.unwrap_or(i64::MIN);
        match best {
            Some(current) if hr <= current.avg_hr.unwrap_or(i64::MIN) => {}
            _ => best = Some(activity),
        }
    }
    best
}

fn intensity_label(avg_hr: f64, config: &EngineConfig) -> &'static str {
    let pct = avg_hr / config.assumed_max_hr * 100.0;
    if pct < config.intensity_low_max_pct {
        "low"
    } else if pct < config.intensity_medium_max_pct {
        "medium"
    } else {
        "high"
    }
}
