use crate::dataset::TripDataset;
use crate::error::StatsError;
use crate::stats::types::{BirthYearStats, UserStats, ValueCounts};
use crate::stats::utility::{mode, value_counts};

/// Trips per user type. Blank user types are not counted.
pub fn user_type_counts(dataset: &TripDataset) -> ValueCounts {
    value_counts(dataset.iter().filter_map(|r| r.user_type.as_deref()))
        .into_iter()
        .collect()
}

/// Trips per gender, or `None` when the source has no gender column.
pub fn gender_counts(dataset: &TripDataset) -> Option<ValueCounts> {
    if !dataset.demographics().gender {
        return None;
    }
    Some(
        value_counts(dataset.iter().filter_map(|r| r.gender.as_deref()))
            .into_iter()
            .collect(),
    )
}

/// Birth-year range and mode, or `None` when the source has no birth-year
/// column. Holds an error when the column exists but no record carries a
/// value.
pub fn birth_year_stats(dataset: &TripDataset) -> Option<Result<BirthYearStats, StatsError>> {
    if !dataset.demographics().birth_year {
        return None;
    }

    let years: Vec<i32> = dataset.iter().filter_map(|r| r.birth_year).collect();
    Some(year_summary(years))
}

fn year_summary(years: Vec<i32>) -> Result<BirthYearStats, StatsError> {
    let min = years.iter().copied().min().ok_or(StatsError::empty("birth_year_min"))?;
    let max = years.iter().copied().max().ok_or(StatsError::empty("birth_year_max"))?;
    let most_common = mode(years).ok_or(StatsError::empty("birth_year_mode"))?;

    Ok(BirthYearStats {
        min,
        max,
        mode: most_common,
    })
}

/// Count tables always succeed, so a missing birth-year value only affects
/// `birth_years`.
#[tracing::instrument(skip_all, fields(records = dataset.len()))]
pub fn user_stats(dataset: &TripDataset) -> UserStats {
    UserStats {
        user_type_counts: user_type_counts(dataset),
        gender_counts: gender_counts(dataset),
        birth_years: birth_year_stats(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Demographics, TripRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_user_stats_with_demographics() {
        let ds = dataset(
            &[
                ("Subscriber", Some("Male"), Some(1992)),
                ("Customer", None, None),
                ("Subscriber", Some("Female"), Some(1985)),
                ("Customer", Some("Female"), Some(1992)),
                ("Subscriber", Some("Male"), Some(1961)),
            ],
            Demographics::FULL,
        );

        let stats = user_stats(&ds);

        let types: Vec<_> = stats
            .user_type_counts
            .iter()
            .map(|e| (e.value.as_str(), e.count))
            .collect();
        assert_eq!(types, vec![("Subscriber", 3), ("Customer", 2)]);

        let genders = stats.gender_counts.unwrap();
        assert_eq!(genders.get("Male"), Some(2));
        assert_eq!(genders.get("Female"), Some(2));
        assert_eq!(genders.total(), 4);

        assert_eq!(
            stats.birth_years,
            Some(Ok(BirthYearStats {
                min: 1961,
                max: 1992,
                mode: 1992,
            }))
        );
    }

    #[test]
    fn test_missing_columns_reported_absent() {
        let ds = dataset(
            &[("Subscriber", None, None), ("Customer", None, None)],
            Demographics::NONE,
        );

        let stats = user_stats(&ds);
        assert_eq!(stats.gender_counts, None);
        assert_eq!(stats.birth_years, None);
        assert_eq!(stats.user_type_counts.len(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let without = dataset(&[], Demographics::NONE);
        let stats = user_stats(&without);
        assert!(stats.user_type_counts.is_empty());

        let with = dataset(&[], Demographics::FULL);
        assert_eq!(gender_counts(&with), Some(ValueCounts::default()));
        assert_eq!(
            birth_year_stats(&with),
            Some(Err(StatsError::EmptyDataset {
                statistic: "birth_year_min"
            }))
        );
    }

    #[test]
    fn test_blank_birth_years_keep_count_tables() {
        // one Customer row with the columns present but both cells blank
        let ds = dataset(&[("Customer", None, None)], Demographics::FULL);

        let stats = user_stats(&ds);
        assert_eq!(stats.user_type_counts.get("Customer"), Some(1));
        assert_eq!(stats.gender_counts, Some(ValueCounts::default()));
        assert_eq!(
            stats.birth_years,
            Some(Err(StatsError::EmptyDataset {
                statistic: "birth_year_min"
            }))
        );
    }

    fn dataset(
        rows: &[(&str, Option<&str>, Option<i32>)],
        demographics: Demographics,
    ) -> TripDataset {
        let ts = NaiveDate::from_ymd_opt(2017, 5, 5)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (user_type, gender, year))| {
                TripRecord::new(i as u64, ts, 60, "A", "B")
                    .with_user_type(*user_type)
                    .with_demographics(*gender, *year)
            })
            .collect();
        TripDataset::from_records(records, demographics)
    }
}
