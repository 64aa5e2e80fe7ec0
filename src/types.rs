//! Core types for the pulselens engine
//!
//! This module defines the stored data model the engine reads (raw samples,
//! sleep sessions, activities, habit entries) and the computed records it
//! produces (daily feature records, correlation/pattern/insight results).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Signal category for raw per-instant samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    HeartRate,
    BodyBattery,
    Stress,
    Hrv,
    Spo2,
    Steps,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::HeartRate => "heart_rate",
            SignalKind::BodyBattery => "body_battery",
            SignalKind::Stress => "stress",
            SignalKind::Hrv => "hrv",
            SignalKind::Spo2 => "spo2",
            SignalKind::Steps => "steps",
        }
    }
}

/// One raw observation of a signal at an instant.
///
/// Timestamps are unique per signal category. Values may carry sentinel
/// codes (stress: -1 resting, -2 unmeasured) which are valid stored values
/// but excluded from aggregate statistics by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Observation instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// Observed value (signal-specific unit)
    pub value: f64,
}

impl RawSample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Sleep data, at most one record per calendar date.
///
/// `[sleep_start, sleep_end)` defines the overnight window used to scope
/// HRV and SpO2 extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepSession {
    pub date: NaiveDate,
    pub sleep_start: Option<DateTime<Utc>>,
    pub sleep_end: Option<DateTime<Utc>>,
    pub total_sleep_seconds: Option<i64>,
    pub deep_sleep_seconds: Option<i64>,
    pub light_sleep_seconds: Option<i64>,
    pub rem_sleep_seconds: Option<i64>,
    pub awake_seconds: Option<i64>,
    /// Vendor sleep score (0-100)
    pub sleep_score: Option<i64>,
}

impl SleepSession {
    /// Create a session for a date with no recorded fields
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sleep_start: None,
            sleep_end: None,
            total_sleep_seconds: None,
            deep_sleep_seconds: None,
            light_sleep_seconds: None,
            rem_sleep_seconds: None,
            awake_seconds: None,
            sleep_score: None,
        }
    }
}

/// A training session or tracked activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// External activity id (unique)
    pub activity_id: String,
    pub activity_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: Option<i64>,
    pub avg_hr: Option<i64>,
}

/// Loose type tag assigned to a habit at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Boolean,
    Counter,
    Other,
}

impl HabitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::Boolean => "boolean",
            HabitKind::Counter => "counter",
            HabitKind::Other => "other",
        }
    }
}

/// One self-reported habit value for a date, unique per (date, habit_name).
///
/// Values are stored as strings with a loose type tag; [`HabitEntry::coerced_value`]
/// applies the coercion rules once, at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitEntry {
    pub date: NaiveDate,
    pub habit_name: String,
    pub raw_value: String,
    pub habit_kind: HabitKind,
}

impl HabitEntry {
    pub fn new(
        date: NaiveDate,
        habit_name: impl Into<String>,
        raw_value: impl Into<String>,
        habit_kind: HabitKind,
    ) -> Self {
        Self {
            date,
            habit_name: habit_name.into(),
            raw_value: raw_value.into(),
            habit_kind,
        }
    }

    /// Coerce the stored string to a number.
    ///
    /// Boolean: 1/0 from case-insensitive "true"/"false". Counter: integer
    /// parse, 0 on empty or unparseable. Other: 0 unless the string is
    /// purely numeric.
    pub fn coerced_value(&self) -> i64 {
        let raw = self.raw_value.trim();
        match self.habit_kind {
            HabitKind::Boolean => i64::from(raw.eq_ignore_ascii_case("true")),
            HabitKind::Counter => {
                if raw.is_empty() {
                    0
                } else {
                    raw.parse().unwrap_or(0)
                }
            }
            HabitKind::Other => {
                if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
                    raw.parse().unwrap_or(0)
                } else {
                    0
                }
            }
        }
    }
}

/// A habit as it appears in a daily feature record, already coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitReading {
    pub name: String,
    pub value: i64,
    #[serde(rename = "type")]
    pub kind: HabitKind,
}

/// A single derived feature value.
///
/// Serializes untagged so a feature record reads as a flat JSON object
/// (`"sleep_hours": 7.5, "had_training": false, ...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view of the value: booleans map to 1/0, text parses if it
    /// is numeric, anything else is absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Bool(b) => Some(f64::from(*b as u8)),
            FeatureValue::Int(i) => Some(*i as f64),
            FeatureValue::Float(f) => Some(*f),
            FeatureValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

/// Named scalar features produced by one extractor. Keys are disjoint
/// across extractors by construction.
pub type FeatureSet = BTreeMap<String, FeatureValue>;

/// A body battery sample prepared for display, local 12-hour clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyBatteryPoint {
    pub time: String,
    pub value: i64,
}

/// All features derived for one calendar date.
///
/// Ephemeral: recomputed on every query, never persisted by the engine.
/// A date with no stored data of any kind yields a record containing only
/// the date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyFeatureRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub scalars: FeatureSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub habits: Vec<HabitReading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bb_samples: Vec<BodyBatteryPoint>,
}

impl DailyFeatureRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            scalars: FeatureSet::new(),
            habits: Vec::new(),
            bb_samples: Vec::new(),
        }
    }

    /// Numeric value of a scalar feature, if present and numeric
    pub fn scalar_f64(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).and_then(FeatureValue::as_f64)
    }

    /// Coerced value of a habit, if reported that day
    pub fn habit_f64(&self, name: &str) -> Option<f64> {
        self.habits
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value as f64)
    }
}

/// Qualitative bucket of a correlation coefficient's magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Classify a Pearson coefficient: |r| > 0.5 strong, > 0.3 moderate,
    /// else weak.
    pub fn classify(r: f64) -> Self {
        let abs_r = r.abs();
        if abs_r > 0.5 {
            Strength::Strong
        } else if abs_r > 0.3 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
        }
    }
}

/// Association between one feature and the target habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationRecord {
    /// Feature name (habit candidates carry a `habit:` prefix)
    pub metric: String,
    /// Pearson correlation coefficient, -1 to 1
    pub coefficient: f64,
    /// Two-tailed significance, 0 to 1
    pub p_value: f64,
    /// Number of (target, feature) pairs used
    pub n: usize,
    pub strength: Strength,
    /// Mean of the feature on target-positive days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_a_avg: Option<f64>,
    /// Mean of the feature on target-negative days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_b_avg: Option<f64>,
    /// Percentage difference between the group means
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_pct: Option<f64>,
}

/// A threshold condition's conditional probability against the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRecord {
    pub description: String,
    /// Target-positive rate among days matching the condition
    pub probability: f64,
    /// Target-positive rate across all eligible days
    pub baseline_probability: f64,
    /// probability / baseline_probability (0 when the baseline is 0)
    pub relative_risk: f64,
    /// Number of eligible days matching the condition
    pub sample_size: usize,
}

/// Confidence label attached to an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Rank for sorting: high=3, medium=2, low=1
    pub fn rank(&self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }
}

/// A ranked, human-readable statement derived from the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRecord {
    pub text: String,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting_metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect_size: Option<f64>,
}
