//! Overnight SpO2 feature extraction

use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::stats;
use crate::store::SampleStore;
use crate::types::{FeatureSet, SignalKind};
use chrono::NaiveDate;

/// Derive blood oxygen features from readings inside the overnight window.
pub fn spo2_features<S: SampleStore>(
    store: &S,
    config: &EngineConfig,
    date: NaiveDate,
) -> Result<FeatureSet, StoreError> {
    let mut features = FeatureSet::new();

    let session = match store.get_sleep_session(date)? {
        Some(session) => session,
        None => return Ok(features),
    };
    let (start, end) = match (session.sleep_start, session.sleep_end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Ok(features),
    };

    let samples = store.get_samples(SignalKind::Spo2, start, end)?;
    if samples.is_empty() {
        return Ok(features);
    }
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

    if let Some(avg) = stats::mean(&values) {
        features.insert("spo2_overnight_avg".into(), avg.into());
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    features.insert("spo2_overnight_min".into(), (min.round() as i64).into());
    features.insert("spo2_overnight_max".into(), (max.round() as i64).into());

    let dips = values
        .iter()
        .filter(|v| **v < config.spo2_dip_threshold)
        .count() as i64;
    features.insert("spo2_dips_below_94".into(), dips.into());

    Ok(features)
}
