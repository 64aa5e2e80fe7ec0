//! Engine configuration
//!
//! Named parameters for the feature extractors, replacing the magic numbers
//! of early versions. Defaults carry the historical values; none of these
//! are discovered from the data.

use serde::{Deserialize, Serialize};

/// Tunable constants used by the feature extractors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Assumed maximum heart rate for intensity classification (bpm).
    /// A fixed constant, not measured per user.
    pub assumed_max_hr: f64,

    /// Training intensity is "low" below this percentage of max HR
    pub intensity_low_max_pct: f64,

    /// Training intensity is "medium" below this percentage of max HR,
    /// "high" at or above it
    pub intensity_medium_max_pct: f64,

    /// Assumed native sampling interval for stress samples (minutes).
    /// `high_stress_minutes` scales the sample count by this.
    pub stress_sample_interval_min: i64,

    /// Stress values above this count as high stress
    pub high_stress_threshold: f64,

    /// SpO2 readings below this count as overnight dips
    pub spo2_dip_threshold: f64,

    /// Maximum distance (minutes) for nearest-sample clock-time lookups
    pub clock_lookup_window_min: i64,

    /// Morning window start, local hour (inclusive)
    pub morning_start_hour: u32,

    /// Morning window end / afternoon window start, local hour (exclusive /
    /// inclusive). Local noon also splits body battery drain-rate groups
    /// and morning steps.
    pub noon_hour: u32,

    /// Afternoon window end, local hour (exclusive)
    pub afternoon_end_hour: u32,

    /// Midday window, local hours `[start, end)`
    pub midday_start_hour: u32,
    pub midday_end_hour: u32,

    /// Local reference hour that `hours_since_training` measures against
    pub afternoon_reference_hour: u32,

    /// Sliding window size (samples) for the resting heart rate minimum.
    /// Two consecutive samples approximate a 30-minute window at the
    /// assumed ~15-minute sampling interval.
    pub resting_hr_window_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assumed_max_hr: 190.0,
            intensity_low_max_pct: 70.0,
            intensity_medium_max_pct: 85.0,
            stress_sample_interval_min: 15,
            high_stress_threshold: 60.0,
            spo2_dip_threshold: 94.0,
            clock_lookup_window_min: 30,
            morning_start_hour: 6,
            noon_hour: 12,
            afternoon_end_hour: 18,
            midday_start_hour: 13,
            midday_end_hour: 16,
            afternoon_reference_hour: 14,
            resting_hr_window_samples: 2,
        }
    }
}
