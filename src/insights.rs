//! Insight generator
//!
//! Turns correlation and pattern output into ranked, human-readable
//! statements about the target habit.

use crate::correlation::{compute_correlations, DEFAULT_MIN_DAYS};
use crate::patterns::compute_patterns;
use crate::types::{Confidence, DailyFeatureRecord, InsightRecord};
use std::cmp::Ordering;
use tracing::debug;

/// Pattern sample size granting high confidence
const HIGH_CONFIDENCE_DAYS: usize = 10;
/// Correlation pair count granting medium confidence
const MEDIUM_CONFIDENCE_PAIRS: usize = 14;
/// Correlations below this magnitude are not worth a sentence
const MIN_REPORTED_R: f64 = 0.3;
/// At most this many correlation sentences
const MAX_CORRELATION_INSIGHTS: usize = 3;

/// Generate ranked insights about `target_habit` from a window of daily
/// records.
///
/// Runs the correlation engine and pattern detector, keeps the findings
/// that clear the reporting thresholds, and orders them by confidence then
/// effect size.
pub fn generate_insights(
    records: &[DailyFeatureRecord],
    target_habit: &str,
) -> Vec<InsightRecord> {
    let mut insights = Vec::new();

    for pattern in compute_patterns(records, target_habit) {
        let confidence = if pattern.sample_size >= HIGH_CONFIDENCE_DAYS {
            Confidence::High
        } else {
            Confidence::Medium
        };
        if pattern.relative_risk > 1.5 && pattern.probability > 0.5 {
            insights.push(InsightRecord {
                text: format!(
                    "{}: {} followed on {:.0}% of those days, {:.1}x your {:.0}% baseline",
                    pattern.description,
                    target_habit,
                    pattern.probability * 100.0,
                    pattern.relative_risk,
                    pattern.baseline_probability * 100.0,
                ),
                confidence,
                supporting_metric: Some(pattern.description.clone()),
                effect_size: Some(pattern.relative_risk),
            });
        } else if pattern.relative_risk < 0.7 && pattern.probability < pattern.baseline_probability
        {
            insights.push(InsightRecord {
                text: format!(
                    "{}: {} followed on only {:.0}% of those days, against a {:.0}% baseline",
                    pattern.description,
                    target_habit,
                    pattern.probability * 100.0,
                    pattern.baseline_probability * 100.0,
                ),
                confidence,
                supporting_metric: Some(pattern.description.clone()),
                effect_size: Some(1.0 - pattern.relative_risk),
            });
        }
    }

    let correlations = compute_correlations(records, target_habit, DEFAULT_MIN_DAYS);
    for correlation in correlations
        .iter()
        .filter(|c| c.coefficient.abs() >= MIN_REPORTED_R)
        .take(MAX_CORRELATION_INSIGHTS)
    {
        let direction = if correlation.coefficient > 0.0 {
            "more"
        } else {
            "fewer"
        };
        let display_name = correlation
            .metric
            .strip_prefix("habit:")
            .unwrap_or(&correlation.metric);
        insights.push(InsightRecord {
            text: format!(
                "Higher {} is associated with {} {} days ({} correlation over {} days)",
                display_name,
                direction,
                target_habit,
                correlation.strength.as_str(),
                correlation.n,
            ),
            confidence: if correlation.n >= MEDIUM_CONFIDENCE_PAIRS {
                Confidence::Medium
            } else {
                Confidence::Low
            },
            supporting_metric: Some(correlation.metric.clone()),
            effect_size: Some(correlation.coefficient.abs()),
        });
    }

    insights.sort_by(|a, b| {
        b.confidence
            .rank()
            .cmp(&a.confidence.rank())
            .then_with(|| {
                b.effect_size
                    .unwrap_or(0.0)
                    .partial_cmp(&a.effect_size.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
    });
    debug!(
        target = target_habit,
        insights = insights.len(),
        "insight generation complete"
    );
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HabitKind, HabitReading};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const TARGET: &str = "pm_slump";

    fn record(offset: u32, target: i64, sleep_hours: f64) -> DailyFeatureRecord {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(offset as i64);
        let mut record = DailyFeatureRecord::new(date);
        record.scalars.insert("sleep_hours".into(), sleep_hours.into());
        record.habits.push(HabitReading {
            name: TARGET.into(),
            value: target,
            kind: HabitKind::Boolean,
        });
        record
    }

    /// Twenty days; slump always follows short sleep, with enough value
    /// spread to keep the correlation well-defined.
    fn window_days() -> Vec<DailyFeatureRecord> {
        (0..20)
            .map(|i| {
                let slump = i % 2 == 0;
                let hours = if slump { 5.0 + 0.05 * i as f64 } else { 8.0 + 0.05 * i as f64 };
                record(i, i64::from(slump), hours)
            })
            .collect()
    }

    #[test]
    fn empty_without_eligible_days() {
        assert!(generate_insights(&[], TARGET).is_empty());
    }

    #[test]
    fn risk_increasing_pattern_gets_a_sentence() {
        let insights = generate_insights(&window_days(), TARGET);

        let pattern = insights
            .iter()
            .find(|i| i.text.starts_with("Less than 7 hours of sleep"))
            .unwrap();
        // Ten matching days out of twenty: rr = 2.0, high confidence
        assert_eq!(pattern.confidence, Confidence::High);
        assert_eq!(pattern.effect_size, Some(2.0));
        assert_eq!(
            pattern.supporting_metric.as_deref(),
            Some("Less than 7 hours of sleep")
        );
        assert!(pattern.text.contains("2.0x"));
        assert!(pattern.text.contains("50% baseline"));
    }

    #[test]
    fn strong_correlation_gets_a_sentence() {
        let insights = generate_insights(&window_days(), TARGET);

        let correlation = insights
            .iter()
            .find(|i| i.supporting_metric.as_deref() == Some("sleep_hours"))
            .unwrap();
        // Negative coefficient reads as "fewer"
        assert!(correlation.text.contains("fewer"));
        assert_eq!(correlation.confidence, Confidence::Medium);
        assert!(correlation.effect_size.unwrap() > 0.9);
    }

    #[test]
    fn sorted_by_confidence_then_effect_size() {
        let insights = generate_insights(&window_days(), TARGET);
        assert!(insights.len() >= 2);
        for pair in insights.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.confidence.rank() >= b.confidence.rank());
            if a.confidence == b.confidence {
                assert!(a.effect_size.unwrap_or(0.0) >= b.effect_size.unwrap_or(0.0));
            }
        }
        assert_eq!(insights[0].confidence, Confidence::High);
    }

    #[test]
    fn weak_correlations_are_not_reported() {
        // Slump unrelated to sleep: slump-day and clear-day sleep means match
        let hours = [7.2, 6.4, 8.1, 7.3, 6.6, 6.8, 7.9, 6.5, 7.9, 8.2, 7.1, 7.8, 7.4, 6.6];
        let records: Vec<_> = (0..14)
            .map(|i| record(i, i64::from(i % 4 == 0), hours[i as usize]))
            .collect();

        let insights = generate_insights(&records, TARGET);
        assert!(insights
            .iter()
            .all(|i| i.supporting_metric.as_deref() != Some("sleep_hours")));
    }
}
