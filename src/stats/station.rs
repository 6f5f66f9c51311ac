use crate::dataset::TripDataset;
use crate::error::StatsError;
use crate::stats::types::StationStats;
use crate::stats::utility::mode;

pub fn top_start_station(dataset: &TripDataset) -> Result<String, StatsError> {
    mode(dataset.iter().map(|r| r.start_station.as_str()))
        .map(str::to_string)
        .ok_or(StatsError::empty("top_start_station"))
}

pub fn top_end_station(dataset: &TripDataset) -> Result<String, StatsError> {
    mode(dataset.iter().map(|r| r.end_station.as_str()))
        .map(str::to_string)
        .ok_or(StatsError::empty("top_end_station"))
}

/// Most common `"start / end"` station pair.
pub fn top_trip(dataset: &TripDataset) -> Result<String, StatsError> {
    mode(dataset.iter().map(|r| r.trip_key())).ok_or(StatsError::empty("top_trip"))
}

#[tracing::instrument(skip_all, fields(records = dataset.len()))]
pub fn station_stats(dataset: &TripDataset) -> Result<StationStats, StatsError> {
    Ok(StationStats {
        top_start_station: top_start_station(dataset)?,
        top_end_station: top_end_station(dataset)?,
        top_trip: top_trip(dataset)?,
    })
}
