//! Pagination and filtering parameters for reading queries.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound for a single page. Larger requests are clamped to this.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u64, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Bring the window inside the supported bounds.
    ///
    /// A zero page becomes the first page, a zero page size becomes
    /// [`DEFAULT_PAGE_SIZE`], and anything above [`MAX_PAGE_SIZE`] is clamped.
    pub fn normalized(self) -> Self {
        let page = self.page.max(1);
        let page_size = match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        Self { page, page_size }
    }

    /// Number of rows to skip. Saturates instead of overflowing for absurd pages.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(u64::from(self.page_size))
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Query parameters shared by every reading endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadingsFilter {
    pub pagination: Pagination,
    /// Inclusive lower bound on the reading timestamp.
    pub start_date: Option<NaiveDate>,
}

impl ReadingsFilter {
    pub fn new(pagination: Pagination, start_date: Option<NaiveDate>) -> Self {
        Self {
            pagination,
            start_date,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            pagination: self.pagination.normalized(),
            ..self
        }
    }

    /// Start of the filter day (00:00:00 UTC), if a start date is set.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start_date.map(start_of_day)
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
