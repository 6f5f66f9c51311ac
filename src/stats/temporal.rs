use chrono::Timelike;

use crate::dataset::TripDataset;
use crate::error::StatsError;
use crate::stats::types::TemporalStats;
use crate::stats::utility::mode;

pub fn top_month(dataset: &TripDataset) -> Result<&'static str, StatsError> {
    mode(dataset.iter().map(|r| r.month_name())).ok_or(StatsError::empty("top_month"))
}

pub fn top_weekday(dataset: &TripDataset) -> Result<&'static str, StatsError> {
    mode(dataset.iter().map(|r| r.weekday_name())).ok_or(StatsError::empty("top_weekday"))
}

/// Most common start hour, 0–23.
pub fn top_hour(dataset: &TripDataset) -> Result<u32, StatsError> {
    mode(dataset.iter().map(|r| r.start_time.hour())).ok_or(StatsError::empty("top_hour"))
}

#[tracing::instrument(skip_all, fields(records = dataset.len()))]
pub fn temporal_stats(dataset: &TripDataset) -> Result<TemporalStats, StatsError> {
    Ok(TemporalStats {
        top_month: top_month(dataset)?,
        top_weekday: top_weekday(dataset)?,
        top_hour: top_hour(dataset)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Demographics, TripRecord};
    use chrono::NaiveDateTime;

    #[test]
    fn test_temporal_stats() {
        let ds = dataset(&[
            "2017-01-02 08:15:00", // Monday
            "2017-03-06 17:00:00", // Monday
            "2017-03-07 17:30:00", // Tuesday
            "2017-01-09 09:00:00", // Monday
            "2017-03-14 08:00:00", // Tuesday
        ]);

        let stats = temporal_stats(&ds).unwrap();
        assert_eq!(stats.top_month, "March");
        assert_eq!(stats.top_weekday, "Monday");
        // 8 and 17 both appear twice; 8 was seen first
        assert_eq!(stats.top_hour, 8);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let ds = dataset(&[]);
        assert_eq!(
            top_month(&ds),
            Err(StatsError::EmptyDataset {
                statistic: "top_month"
            })
        );
        assert!(top_weekday(&ds).is_err());
        assert!(top_hour(&ds).is_err());
        assert!(temporal_stats(&ds).is_err());
    }

    fn dataset(times: &[&str]) -> TripDataset {
        let records = times
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let ts = NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").unwrap();
                TripRecord::new(i as u64, ts, 60, "A", "B")
            })
            .collect();
        TripDataset::from_records(records, Demographics::NONE)
    }
}
