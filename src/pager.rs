//! Fixed-size windows over a dataset for raw record display.

use std::num::NonZeroUsize;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::dataset::{TripDataset, TripRecord};

/// Position of the next record to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerCursor {
    pub offset: usize,
}

/// One window of records.
#[derive(Debug, PartialEq)]
pub struct Page<'a> {
    pub records: &'a [TripRecord],
    pub has_more: bool,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Returns up to `page_size` records from `cursor` and the advanced cursor.
///
/// Past the end this yields an empty page with `has_more == false`.
pub fn next_page<'a>(
    cursor: PagerCursor,
    dataset: &'a TripDataset,
    page_size: NonZeroUsize,
) -> (Page<'a>, PagerCursor) {
    let records = dataset.records();
    let start = cursor.offset.min(records.len());
    let end = start.saturating_add(page_size.get()).min(records.len());

    let page = Page {
        records: &records[start..end],
        has_more: end < records.len(),
    };
    (page, PagerCursor { offset: end })
}

/// Owns a cursor and page size for one display loop.
#[derive(Debug, Clone)]
pub struct RawDataPager {
    cursor: PagerCursor,
    page_size: NonZeroUsize,
}

impl Default for RawDataPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RawDataPager {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            cursor: PagerCursor::default(),
            page_size,
        }
    }

    /// Reads the next page and advances in one step.
    pub fn next<'a>(&mut self, dataset: &'a TripDataset) -> Page<'a> {
        let (page, cursor) = next_page(self.cursor, dataset, self.page_size);
        self.cursor = cursor;
        page
    }

    pub fn cursor(&self) -> PagerCursor {
        self.cursor
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }
}
