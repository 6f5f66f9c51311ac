//! Descriptive statistics over a trip dataset.
//!
//! Four independent groups: temporal, station, duration and user. Each is
//! read-only over its input. Mode and mean statistics fail with
//! [`StatsError::EmptyDataset`] on empty input. Sums and frequency tables
//! return zero or an empty table instead.

pub mod duration;
pub mod station;
pub mod temporal;
pub mod types;
pub mod user;
pub mod utility;

pub use duration::duration_stats;
pub use station::station_stats;
pub use temporal::temporal_stats;
pub use types::{
    BirthYearStats, CountEntry, DurationStats, StationStats, StatisticsReport, TemporalStats,
    UserStats, ValueCounts,
};
pub use user::user_stats;

use crate::dataset::TripDataset;
use crate::error::StatsError;

impl StatisticsReport {
    /// Computes every group. Fails on the first mode or mean with no data.
    /// Birth-year failures stay inside [`UserStats::birth_years`].
    pub fn compute(dataset: &TripDataset) -> Result<Self, StatsError> {
        Ok(StatisticsReport {
            records: dataset.len(),
            temporal: temporal_stats(dataset)?,
            stations: station_stats(dataset)?,
            durations: duration_stats(dataset)?,
            users: user_stats(dataset),
        })
    }
}
