//! Sleep feature extraction

use crate::error::StoreError;
use crate::store::SampleStore;
use crate::types::FeatureSet;
use chrono::NaiveDate;

/// Derive sleep features from the day's sleep session.
///
/// Requires a session with positive `total_sleep_seconds`; anything less
/// yields the empty set.
pub fn sleep_features<S: SampleStore>(
    store: &S,
    date: NaiveDate,
) -> Result<FeatureSet, StoreError> {
    let mut features = FeatureSet::new();

    let session = match store.get_sleep_session(date)? {
        Some(session) => session,
        None => return Ok(features),
    };
    let total = match session.total_sleep_seconds {
        Some(total) if total > 0 => total,
        _ => return Ok(features),
    };

    features.insert("sleep_hours".into(), (total as f64 / 3600.0).into());
    if let Some(score) = session.sleep_score {
        features.insert("sleep_score".into(), score.into());
    }

    if let Some(deep) = session.deep_sleep_seconds.filter(|d| *d > 0) {
        features.insert(
            "deep_sleep_pct".into(),
            (deep as f64 / total as f64 * 100.0).into(),
        );
    }
    if let Some(rem) = session.rem_sleep_seconds.filter(|r| *r > 0) {
        features.insert(
            "rem_sleep_pct".into(),
            (rem as f64 / total as f64 * 100.0).into(),
        );
    }

    // Efficiency needs both bounds; time in bed can legitimately exceed sleep
    if let (Some(start), Some(end)) = (session.sleep_start, session.sleep_end) {
        let time_in_bed = (end - start).num_seconds();
        if time_in_bed > 0 {
            features.insert(
                "sleep_efficiency".into(),
                (total as f64 / time_in_bed as f64 * 100.0).into(),
            );
        }
    }

    Ok(features)
}
