//! Correlation engine
//!
//! Measures association between each derived feature and a target habit
//! across a window of daily records. Habit candidates are disambiguated
//! from scalar features with a `habit:` prefix.

use crate::stats;
use crate::types::{CorrelationRecord, DailyFeatureRecord, Strength};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Minimum eligible days (and valid pairs per feature) when the caller has
/// no stricter requirement
pub const DEFAULT_MIN_DAYS: usize = 5;

/// Correlate every available feature against `target_habit`.
///
/// Days without a reported target habit are ignored. Returns empty when
/// fewer than `min_days` days remain; individual features are skipped when
/// they have fewer than `min_days` valid pairs or zero variance. Results
/// are ordered by coefficient magnitude descending, stable on ties.
pub fn compute_correlations(
    records: &[DailyFeatureRecord],
    target_habit: &str,
    min_days: usize,
) -> Vec<CorrelationRecord> {
    let eligible: Vec<&DailyFeatureRecord> = records
        .iter()
        .filter(|r| r.habit_f64(target_habit).is_some())
        .collect();
    if eligible.len() < min_days {
        debug!(
            target = target_habit,
            eligible = eligible.len(),
            min_days,
            "not enough eligible days for correlation"
        );
        return Vec::new();
    }

    // Candidate universe spans every eligible day: any single day may be
    // missing a whole feature category.
    let mut candidates: BTreeSet<String> = BTreeSet::new();
    for day in &eligible {
        candidates.extend(day.scalars.keys().cloned());
        for habit in &day.habits {
            if habit.name != target_habit {
                candidates.insert(format!("habit:{}", habit.name));
            }
        }
    }

    let mut results = Vec::new();
    for metric in candidates {
        let mut targets = Vec::new();
        let mut values = Vec::new();
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for day in &eligible {
            let target = match day.habit_f64(target_habit) {
                Some(target) => target,
                None => continue,
            };
            let value = match metric.strip_prefix("habit:") {
                Some(name) => day.habit_f64(name),
                None => day.scalar_f64(&metric),
            };
            let value = match value {
                Some(value) => value,
                None => continue,
            };
            targets.push(target);
            values.push(value);
            if target == 1.0 {
                positive.push(value);
            } else if target == 0.0 {
                negative.push(value);
            }
        }

        if targets.len() < min_days {
            continue;
        }
        // Undefined correlation: either series constant
        if is_constant(&values) || is_constant(&targets) {
            debug!(metric = %metric, "skipping feature with zero variance");
            continue;
        }
        let (r, p_value) = match stats::pearson(&values, &targets) {
            Some(result) => result,
            None => {
                debug!(metric = %metric, "skipping feature with undefined correlation");
                continue;
            }
        };

        let group_a_avg = stats::mean(&positive);
        let group_b_avg = stats::mean(&negative);
        let difference_pct = match (group_a_avg, group_b_avg) {
            (Some(a), Some(b)) if b != 0.0 => Some((a - b) / b * 100.0),
            _ => None,
        };

        results.push(CorrelationRecord {
            metric,
            coefficient: r,
            p_value,
            n: targets.len(),
            strength: Strength::classify(r),
            group_a_avg,
            group_b_avg,
            difference_pct,
        });
    }

    results.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(Ordering::Equal)
    });
    debug!(
        target = target_habit,
        results = results.len(),
        "correlation pass complete"
    );
    results
}

fn is_constant(values: &[f64]) -> bool {
    stats::population_std(values).map_or(true, |std| std == 0.0)
}
