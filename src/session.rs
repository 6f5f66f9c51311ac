//! One analysis run: load, filter, then statistics and paging on demand.

use std::num::NonZeroUsize;
use tracing::info;

use crate::config::CityRegistry;
use crate::dataset::TripDataset;
use crate::error::{AnalysisError, StatsError};
use crate::filter::{FilterCriteria, filter};
use crate::pager::{Page, RawDataPager};
use crate::stats::{
    self, DurationStats, StationStats, StatisticsReport, TemporalStats, UserStats,
};

pub struct AnalysisSession {
    city: String,
    source: TripDataset,
    criteria: FilterCriteria,
    view: TripDataset,
    pager: RawDataPager,
}

impl AnalysisSession {
    /// Loads `city` from the registry and applies `criteria`.
    pub fn open(
        registry: &CityRegistry,
        city: &str,
        criteria: FilterCriteria,
        page_size: NonZeroUsize,
    ) -> Result<Self, AnalysisError> {
        let source = TripDataset::load(registry, city)?;
        Ok(Self::from_dataset(city, source, criteria, page_size))
    }

    /// Starts a session over an already loaded dataset.
    pub fn from_dataset(
        city: &str,
        source: TripDataset,
        criteria: FilterCriteria,
        page_size: NonZeroUsize,
    ) -> Self {
        let view = filter(&source, &criteria);
        info!(city, %criteria, total = source.len(), selected = view.len(), "Session ready");
        Self {
            city: city.to_string(),
            source,
            criteria,
            view,
            pager: RawDataPager::new(page_size),
        }
    }

    /// Applies new criteria to the loaded source. Paging restarts from the
    /// first record of the new view.
    pub fn refilter(&mut self, criteria: FilterCriteria) {
        self.view = filter(&self.source, &criteria);
        self.criteria = criteria;
        self.pager = RawDataPager::new(self.pager.page_size());
        info!(city = %self.city, %criteria, selected = self.view.len(), "Session refiltered");
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.criteria
    }

    /// The filtered records.
    pub fn dataset(&self) -> &TripDataset {
        &self.view
    }

    pub fn source(&self) -> &TripDataset {
        &self.source
    }

    pub fn temporal_stats(&self) -> Result<TemporalStats, StatsError> {
        stats::temporal_stats(&self.view)
    }

    pub fn station_stats(&self) -> Result<StationStats, StatsError> {
        stats::station_stats(&self.view)
    }

    pub fn duration_stats(&self) -> Result<DurationStats, StatsError> {
        stats::duration_stats(&self.view)
    }

    pub fn user_stats(&self) -> UserStats {
        stats::user_stats(&self.view)
    }

    pub fn report(&self) -> Result<StatisticsReport, AnalysisError> {
        Ok(StatisticsReport::compute(&self.view)?)
    }

    pub fn next_page(&mut self) -> Page<'_> {
        self.pager.next(&self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Demographics, TripRecord};
    use crate::error::{LoadError, Stage};
    use chrono::NaiveDate;

    #[test]
    fn test_open_unknown_city() {
        let registry = CityRegistry::builtin(".");
        let err = AnalysisSession::open(
            &registry,
            "gotham",
            FilterCriteria::all(),
            NonZeroUsize::new(5).unwrap(),
        )
        .err()
        .unwrap();

        assert_eq!(err.stage(), Stage::Load);
        assert!(matches!(err, AnalysisError::Load(LoadError::UnknownSource(_))));
    }

    #[test]
    fn test_refilter_resets_paging() {
        let mut session = AnalysisSession::from_dataset(
            "chicago",
            dataset(),
            FilterCriteria::all(),
            NonZeroUsize::new(2).unwrap(),
        );
        assert_eq!(session.dataset().len(), 4);
        assert_eq!(session.next_page().records.len(), 2);

        session.refilter(FilterCriteria::new("February", "All").unwrap());
        assert_eq!(session.dataset().len(), 1);
        assert_eq!(session.source().len(), 4);

        let page = session.next_page();
        assert_eq!(page.records[0].id, 2);
        assert!(!page.has_more);
    }

    #[test]
    fn test_empty_view_statistics() {
        let session = AnalysisSession::from_dataset(
            "chicago",
            dataset(),
            FilterCriteria::new("June", "All").unwrap(),
            NonZeroUsize::new(5).unwrap(),
        );

        assert!(matches!(
            session.temporal_stats(),
            Err(StatsError::EmptyDataset { .. })
        ));
        assert_eq!(session.report().unwrap_err().stage(), Stage::Statistic);
        assert_eq!(stats::duration::total_duration(session.dataset()), 0);
    }

    fn dataset() -> TripDataset {
        let days = [(1, 1, 3), (2, 2, 14), (3, 1, 20), (4, 3, 9)];
        let records = days
            .into_iter()
            .map(|(id, month, day)| {
                let ts = NaiveDate::from_ymd_opt(2017, month, day)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap();
                TripRecord::new(id, ts, 300, "A", "B").with_user_type("Subscriber")
            })
            .collect();
        TripDataset::from_records(records, Demographics::NONE)
    }
}
