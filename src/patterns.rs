//! Pattern detector
//!
//! Evaluates a catalogue of threshold conditions over daily feature records
//! and scores each one's conditional probability against the target
//! habit's baseline rate.

use crate::types::{DailyFeatureRecord, PatternRecord};
use std::cmp::Ordering;
use tracing::debug;

/// Minimum eligible days before any pattern is reported
pub const MIN_ELIGIBLE_DAYS: usize = 7;
/// Minimum days matching a condition before it is scored
pub const MIN_SUBSET_DAYS: usize = 5;

/// Where a condition reads its value from
#[derive(Debug, Clone)]
pub enum MetricRef {
    Scalar(String),
    Habit(String),
}

/// Threshold applied to the metric's numeric value
#[derive(Debug, Clone, Copy)]
pub enum Threshold {
    Below(f64),
    Above(f64),
    IsTrue,
}

/// One named boolean condition in the catalogue.
///
/// A day with no value for the metric never matches.
#[derive(Debug, Clone)]
pub struct PatternCondition {
    pub description: String,
    pub metric: MetricRef,
    pub test: Threshold,
}

impl PatternCondition {
    pub fn scalar_below(description: &str, metric: &str, threshold: f64) -> Self {
        Self {
            description: description.into(),
            metric: MetricRef::Scalar(metric.into()),
            test: Threshold::Below(threshold),
        }
    }

    pub fn scalar_true(description: &str, metric: &str) -> Self {
        Self {
            description: description.into(),
            metric: MetricRef::Scalar(metric.into()),
            test: Threshold::IsTrue,
        }
    }

    pub fn habit_above(description: &str, habit: &str, threshold: f64) -> Self {
        Self {
            description: description.into(),
            metric: MetricRef::Habit(habit.into()),
            test: Threshold::Above(threshold),
        }
    }

    pub fn habit_true(description: &str, habit: &str) -> Self {
        Self {
            description: description.into(),
            metric: MetricRef::Habit(habit.into()),
            test: Threshold::IsTrue,
        }
    }

    fn matches(&self, record: &DailyFeatureRecord) -> bool {
        let value = match &self.metric {
            MetricRef::Scalar(name) => record.scalar_f64(name),
            MetricRef::Habit(name) => record.habit_f64(name),
        };
        let value = match value {
            Some(value) => value,
            None => return false,
        };
        match self.test {
            Threshold::Below(t) => value < t,
            Threshold::Above(t) => value > t,
            Threshold::IsTrue => value == 1.0,
        }
    }
}

/// The built-in catalogue: conditions tied to commonly tracked habits and
/// the derived sleep / body battery / training features.
pub fn default_conditions() -> Vec<PatternCondition> {
    vec![
        PatternCondition::scalar_below("Less than 7 hours of sleep", "sleep_hours", 7.0),
        PatternCondition::habit_above("More than 2 beers", "beer_count", 2.0),
        PatternCondition::habit_above("More than 3 coffees", "coffee_count", 3.0),
        PatternCondition::habit_true("Carb-heavy lunch", "carb_heavy_lunch"),
        PatternCondition::scalar_below("Body battery below 50 at 9am", "bb_9am", 50.0),
        PatternCondition::scalar_true("Trained that day", "had_training"),
    ]
}

/// Score the default catalogue against `target_habit`.
pub fn compute_patterns(
    records: &[DailyFeatureRecord],
    target_habit: &str,
) -> Vec<PatternRecord> {
    compute_patterns_with(records, target_habit, &default_conditions())
}

/// Score an explicit condition catalogue against `target_habit`.
///
/// Requires at least seven days reporting the target habit; conditions
/// matching fewer than five of them are dropped. Results are ordered by
/// relative risk descending, stable on ties.
pub fn compute_patterns_with(
    records: &[DailyFeatureRecord],
    target_habit: &str,
    conditions: &[PatternCondition],
) -> Vec<PatternRecord> {
    let eligible: Vec<&DailyFeatureRecord> = records
        .iter()
        .filter(|r| r.habit_f64(target_habit).is_some())
        .collect();
    if eligible.len() < MIN_ELIGIBLE_DAYS {
        debug!(
            target = target_habit,
            eligible = eligible.len(),
            "not enough eligible days for pattern detection"
        );
        return Vec::new();
    }

    let positive_days = eligible
        .iter()
        .filter(|r| r.habit_f64(target_habit) == Some(1.0))
        .count();
    let baseline_probability = positive_days as f64 / eligible.len() as f64;

    let mut results = Vec::new();
    for condition in conditions {
        let subset: Vec<&&DailyFeatureRecord> =
            eligible.iter().filter(|r| condition.matches(r)).collect();
        if subset.len() < MIN_SUBSET_DAYS {
            continue;
        }
        let subset_positive = subset
            .iter()
            .filter(|r| r.habit_f64(target_habit) == Some(1.0))
            .count();
        let probability = subset_positive as f64 / subset.len() as f64;
        let relative_risk = if baseline_probability > 0.0 {
            probability / baseline_probability
        } else {
            0.0
        };

        results.push(PatternRecord {
            description: condition.description.clone(),
            probability,
            baseline_probability,
            relative_risk,
            sample_size: subset.len(),
        });
    }

    results.sort_by(|a, b| {
        b.relative_risk
            .partial_cmp(&a.relative_risk)
            .unwrap_or(Ordering::Equal)
    });
    results
}
