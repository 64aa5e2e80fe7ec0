//! Pulselens - Daily biometrics feature derivation and habit analysis
//!
//! Pulselens turns sparse, irregularly-sampled wearable data into a fixed
//! per-day feature vector, then measures how any feature relates to a
//! binary outcome habit across a window of days: sample store → feature
//! extraction → daily aggregation → {correlation, pattern detection} →
//! insight generation.
//!
//! ## Modules
//!
//! - **Features**: per-signal extractors and the [`FeatureEngine`] aggregator
//! - **Analysis**: correlation engine, pattern detector, insight generator

pub mod config;
pub mod correlation;
pub mod error;
pub mod features;
pub mod insights;
pub mod patterns;
pub mod stats;
pub mod store;
pub mod timeutil;
pub mod types;

pub use config::EngineConfig;
pub use correlation::compute_correlations;
pub use error::{EngineError, StoreError};
pub use features::FeatureEngine;
pub use insights::generate_insights;
pub use patterns::{compute_patterns, compute_patterns_with, PatternCondition};
pub use store::{MemoryStore, SampleStore};
pub use timeutil::DateRange;
pub use types::{
    CorrelationRecord, DailyFeatureRecord, InsightRecord, PatternRecord, RawSample, SignalKind,
};

/// Engine version reported to embedders
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
