//! Habit log feature extraction
//!
//! Habit entries are self-reported and typed loosely; each is carried into
//! the day's record as a named reading with both its raw text and a
//! numeric coercion.

use crate::error::StoreError;
use crate::store::SampleStore;
use crate::types::HabitReading;
use chrono::NaiveDate;

/// Collect the day's habit entries as readings, in entry-name order.
pub fn habit_readings<S: SampleStore>(
    store: &S,
    date: NaiveDate,
) -> Result<Vec<HabitReading>, StoreError> {
    let mut entries = store.get_habit_entries(date)?;
    entries.sort_by(|a, b| a.habit_name.cmp(&b.habit_name));
    Ok(entries
        .into_iter()
        .map(|entry| HabitReading {
            value: entry.coerced_value(),
            kind: entry.habit_kind,
            name: entry.habit_name,
        })
        .collect())
}
