//! Sample store interface
//!
//! The engine reads raw time-series and per-day records through the
//! [`SampleStore`] trait; it is the only seam that performs I/O. Real
//! deployments back it with a database; [`MemoryStore`] backs tests and
//! embedders that already hold the data in memory.

use crate::error::StoreError;
use crate::types::{Activity, HabitEntry, RawSample, SignalKind, SleepSession};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

/// Read-only access to stored samples and per-day records.
///
/// All range queries use half-open `[start, end)` intervals and return
/// results ordered by timestamp ascending. Implementations must be safe to
/// call concurrently for disjoint dates; the engine never writes.
pub trait SampleStore {
    /// The sleep session recorded for a calendar date, if any
    fn get_sleep_session(&self, date: NaiveDate) -> Result<Option<SleepSession>, StoreError>;

    /// Samples of one signal category within `[start, end)`, ascending
    fn get_samples(
        &self,
        kind: SignalKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawSample>, StoreError>;

    /// Activities starting within `[start, end)`, ordered by start time
    fn get_activities(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Activity>, StoreError>;

    /// All habit entries reported for a calendar date
    fn get_habit_entries(&self, date: NaiveDate) -> Result<Vec<HabitEntry>, StoreError>;
}

/// In-memory [`SampleStore`] backed by sorted vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    samples: HashMap<SignalKind, Vec<RawSample>>,
    sleep: HashMap<NaiveDate, SleepSession>,
    activities: Vec<Activity>,
    habits: HashMap<NaiveDate, Vec<HabitEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw sample, replacing any existing sample of the same
    /// category at the same instant.
    pub fn add_sample(&mut self, kind: SignalKind, sample: RawSample) {
        let series = self.samples.entry(kind).or_default();
        series.retain(|s| s.timestamp != sample.timestamp);
        series.push(sample);
        series.sort_by_key(|s| s.timestamp);
    }

    /// Insert or replace the sleep session for its date
    pub fn add_sleep_session(&mut self, session: SleepSession) {
        self.sleep.insert(session.date, session);
    }

    /// Insert an activity, replacing any existing activity with the same id
    pub fn add_activity(&mut self, activity: Activity) {
        self.activities
            .retain(|a| a.activity_id != activity.activity_id);
        self.activities.push(activity);
        self.activities.sort_by_key(|a| a.start_time);
    }

    /// Insert a habit entry, replacing any existing (date, name) entry
    pub fn add_habit_entry(&mut self, entry: HabitEntry) {
        let entries = self.habits.entry(entry.date).or_default();
        entries.retain(|e| e.habit_name != entry.habit_name);
        entries.push(entry);
    }
}

impl SampleStore for MemoryStore {
    fn get_sleep_session(&self, date: NaiveDate) -> Result<Option<SleepSession>, StoreError> {
        Ok(self.sleep.get(&date).cloned())
    }

    fn get_samples(
        &self,
        kind: SignalKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawSample>, StoreError> {
        let series = match self.samples.get(&kind) {
            Some(series) => series,
            None => return Ok(Vec::new()),
        };
        Ok(series
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp < end)
            .copied()
            .collect())
    }

    fn get_activities(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Activity>, StoreError> {
        Ok(self
            .activities
            .iter()
            .filter(|a| a.start_time >= start && a.start_time < end)
            .cloned()
            .collect())
    }

    fn get_habit_entries(&self, date: NaiveDate) -> Result<Vec<HabitEntry>, StoreError> {
        Ok(self.habits.get(&date).cloned().unwrap_or_default())
    }
}
