//! Month and weekday filtering.

use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::calendar;
use crate::dataset::TripDataset;
use crate::error::CriteriaError;

/// Either every value, or a single named one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(&'static str),
}

impl Selection {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => *wanted == name,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(name) => f.write_str(name),
        }
    }
}

/// Month / weekday predicate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub month: Selection,
    pub weekday: Selection,
}

impl FilterCriteria {
    pub fn new(month: &str, weekday: &str) -> Result<Self, CriteriaError> {
        Ok(Self {
            month: parse_month(month)?,
            weekday: parse_weekday(weekday)?,
        })
    }

    pub fn all() -> Self {
        Self::default()
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month={}, day={}", self.month, self.weekday)
    }
}

pub fn parse_month(input: &str) -> Result<Selection, CriteriaError> {
    parse_selection(input, calendar::lookup_month).ok_or_else(|| CriteriaError::Month(input.to_string()))
}

pub fn parse_weekday(input: &str) -> Result<Selection, CriteriaError> {
    parse_selection(input, calendar::lookup_weekday)
        .ok_or_else(|| CriteriaError::Weekday(input.to_string()))
}

fn parse_selection(input: &str, lookup: fn(&str) -> Option<&'static str>) -> Option<Selection> {
    if input.trim().eq_ignore_ascii_case("all") {
        Some(Selection::All)
    } else {
        lookup(input).map(Selection::Only)
    }
}

impl FromStr for FilterCriteria {
    type Err = CriteriaError;

    /// Parses `"<month>,<weekday>"`, e.g. `"March,Friday"` or `"All,All"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, weekday) = s.split_once(',').unwrap_or((s, "All"));
        Self::new(month, weekday)
    }
}

/// Keeps the records matching `criteria`, in their original order.
#[tracing::instrument(skip_all, fields(input = dataset.len(), criteria = %criteria))]
pub fn filter(dataset: &TripDataset, criteria: &FilterCriteria) -> TripDataset {
    let records = dataset
        .iter()
        .filter(|r| criteria.month.matches(r.month_name()))
        .filter(|r| criteria.weekday.matches(r.weekday_name()))
        .cloned()
        .collect::<Vec<_>>();

    debug!(output = records.len(), "Filter applied");
    TripDataset::from_records(records, dataset.demographics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Demographics, TripRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_parse_criteria() {
        let c = FilterCriteria::new("march", "FRIDAY").unwrap();
        assert_eq!(c.month, Selection::Only("March"));
        assert_eq!(c.weekday, Selection::Only("Friday"));

        assert_eq!(FilterCriteria::new("All", "all").unwrap(), FilterCriteria::all());
        assert_eq!(
            FilterCriteria::new("Smarch", "All"),
            Err(CriteriaError::Month("Smarch".into()))
        );
        assert_eq!(
            FilterCriteria::new("All", "Funday"),
            Err(CriteriaError::Weekday("Funday".into()))
        );
    }

    #[test]
    fn test_from_str() {
        let c: FilterCriteria = "June,Sunday".parse().unwrap();
        assert_eq!(c.to_string(), "month=June, day=Sunday");

        let month_only: FilterCriteria = "June".parse().unwrap();
        assert_eq!(month_only.weekday, Selection::All);
    }

    #[test]
    fn test_all_all_is_identity() {
        let ds = sample();
        let out = filter(&ds, &FilterCriteria::all());
        assert_eq!(out, ds);
    }

    #[test]
    fn test_month_filter_preserves_order() {
        let ds = sample();
        let out = filter(&ds, &FilterCriteria::new("January", "All").unwrap());
        let ids: Vec<_> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_month_and_weekday_compose() {
        let ds = sample();
        let out = filter(&ds, &FilterCriteria::new("January", "Sunday").unwrap());
        let ids: Vec<_> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_no_match_yields_empty_dataset() {
        let ds = sample();
        let out = filter(&ds, &FilterCriteria::new("June", "All").unwrap());
        assert!(out.is_empty());
        assert_eq!(out.demographics(), ds.demographics());
    }

    #[test]
    fn test_filter_result_is_subsequence() {
        let ds = sample();
        for month in ["All", "January", "February", "June"] {
            for day in ["All", "Sunday", "Monday", "Wednesday"] {
                let out = filter(&ds, &FilterCriteria::new(month, day).unwrap());
                assert!(out.len() <= ds.len());
                let mut source = ds.iter();
                for r in &out {
                    assert!(source.any(|s| s == r), "{month}/{day} broke ordering");
                }
            }
        }
    }

    fn sample() -> TripDataset {
        // 2017-01-01 Sunday, 2017-01-04 Wednesday, 2017-02-06 Monday, 2017-01-08 Sunday
        let rows = [
            (1, (2017, 1, 1)),
            (2, (2017, 2, 6)),
            (3, (2017, 1, 4)),
            (4, (2017, 1, 8)),
        ];
        let records = rows
            .into_iter()
            .map(|(id, (y, m, d))| {
                let ts = NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap();
                TripRecord::new(id, ts, 100, "A", "B")
            })
            .collect();
        TripDataset::from_records(records, Demographics::NONE)
    }
}
