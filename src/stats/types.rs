//! Report types produced by the statistics engine.

use serde::Serialize;

use crate::error::StatsError;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    pub top_month: &'static str,
    pub top_weekday: &'static str,
    pub top_hour: u32,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub top_start_station: String,
    pub top_end_station: String,
    pub top_trip: String,
}

/// Total and average trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_duration: u128,
    pub mean_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub value: String,
    pub count: usize,
}

/// Frequency table, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueCounts(Vec<CountEntry>);

impl ValueCounts {
    pub fn get(&self, value: &str) -> Option<usize> {
        self.0.iter().find(|e| e.value == value).map(|e| e.count)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|e| e.count).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for ValueCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        ValueCounts(
            iter.into_iter()
                .map(|(value, count)| CountEntry {
                    value: value.into(),
                    count,
                })
                .collect(),
        )
    }
}

/// Earliest, most recent and most common rider birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub min: i32,
    pub max: i32,
    pub mode: i32,
}

/// Rider breakdown. `gender_counts` and `birth_years` are `None` when the
/// source does not record those columns at all. `birth_years` holds an error
/// when the column exists but no selected record carries a value; the count
/// tables are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_type_counts: ValueCounts,
    pub gender_counts: Option<ValueCounts>,
    pub birth_years: Option<Result<BirthYearStats, StatsError>>,
}

/// All four statistic groups over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub records: usize,
    pub temporal: TemporalStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}
