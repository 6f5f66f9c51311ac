use crate::dataset::TripDataset;
use crate::error::StatsError;
use crate::stats::types::DurationStats;
use crate::stats::utility::mean;

/// Sum of all trip durations in seconds. Zero for an empty dataset.
/// Accumulates in `u128`, so no dataset of `u64` durations can overflow it.
pub fn total_duration(dataset: &TripDataset) -> u128 {
    dataset.iter().map(|r| u128::from(r.duration_seconds)).sum()
}

pub fn mean_duration(dataset: &TripDataset) -> Result<f64, StatsError> {
    let durations: Vec<u64> = dataset.iter().map(|r| r.duration_seconds).collect();
    mean(&durations).ok_or(StatsError::empty("mean_duration"))
}

#[tracing::instrument(skip_all, fields(records = dataset.len()))]
pub fn duration_stats(dataset: &TripDataset) -> Result<DurationStats, StatsError> {
    Ok(DurationStats {
        total_duration: total_duration(dataset),
        mean_duration: mean_duration(dataset)?,
    })
}
