//! Daily feature derivation
//!
//! One extractor per signal category turns a day's raw samples into named
//! scalar features; [`FeatureEngine`] composes them into a
//! [`DailyFeatureRecord`] per date. Extractors are pure given the store's
//! query results and return an empty feature set when their source data is
//! absent — only store failures propagate.

pub mod activity;
pub mod body_battery;
pub mod habits;
pub mod heart_rate;
pub mod hrv;
pub mod sleep;
pub mod spo2;
pub mod stress;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::store::SampleStore;
use crate::timeutil::{parse_timezone, DateRange};
use crate::types::{DailyFeatureRecord, FeatureSet};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

/// Derives per-day feature records from a sample store.
pub struct FeatureEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: SampleStore> FeatureEngine<S> {
    /// Create an engine with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute all features for a single day.
    ///
    /// The record always carries the date; every other field depends on
    /// what the store holds for that day.
    pub fn daily_features(
        &self,
        date: NaiveDate,
        timezone: &str,
    ) -> Result<DailyFeatureRecord, EngineError> {
        let tz = parse_timezone(timezone)?;
        self.daily_features_tz(date, tz)
    }

    /// Compute features for every date from `start` to `end` inclusive.
    pub fn features_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        timezone: &str,
    ) -> Result<Vec<DailyFeatureRecord>, EngineError> {
        if start > end {
            return Err(EngineError::InvalidDateRange(format!(
                "start {start} is after end {end}"
            )));
        }
        let tz = parse_timezone(timezone)?;

        let mut records = Vec::new();
        let mut current = start;
        loop {
            records.push(self.daily_features_tz(current, tz)?);
            if current >= end {
                break;
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(records)
    }

    /// Compute features for a [`DateRange`], resolved against the caller's
    /// notion of "today".
    pub fn features_range(
        &self,
        range: DateRange,
        today: NaiveDate,
        timezone: &str,
    ) -> Result<Vec<DailyFeatureRecord>, EngineError> {
        let (start, end) = range.resolve(today)?;
        self.features_between(start, end, timezone)
    }

    fn daily_features_tz(&self, date: NaiveDate, tz: Tz) -> Result<DailyFeatureRecord, EngineError> {
        let mut record = DailyFeatureRecord::new(date);

        merge(&mut record.scalars, sleep::sleep_features(&self.store, date)?);
        merge(&mut record.scalars, hrv::hrv_features(&self.store, date)?);
        merge(
            &mut record.scalars,
            spo2::spo2_features(&self.store, &self.config, date)?,
        );
        merge(
            &mut record.scalars,
            heart_rate::heart_rate_features(&self.store, &self.config, date, tz)?,
        );

        let (bb_features, bb_points) =
            body_battery::body_battery_features(&self.store, &self.config, date, tz)?;
        merge(&mut record.scalars, bb_features);
        record.bb_samples = bb_points;

        merge(
            &mut record.scalars,
            stress::stress_features(&self.store, &self.config, date, tz)?,
        );
        merge(
            &mut record.scalars,
            activity::activity_features(&self.store, &self.config, date, tz)?,
        );

        record.habits = habits::habit_readings(&self.store, date)?;

        debug!(
            date = %date,
            scalars = record.scalars.len(),
            habits = record.habits.len(),
            "computed daily features"
        );
        Ok(record)
    }
}

/// Merge an extractor's output without clobbering earlier keys.
/// Extractor key sets are disjoint by construction.
fn merge(into: &mut FeatureSet, from: FeatureSet) {
    for (key, value) in from {
        into.entry(key).or_insert(value);
    }
}
