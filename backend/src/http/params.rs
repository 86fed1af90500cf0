//! Query-string parsing for the reading endpoints.
//!
//! The query string is taken as raw key/value pairs and validated here so
//! every failure maps to one of the JSON error bodies below.

use chrono::NaiveDate;

use crate::models::{Pagination, ReadingsFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// A query parameter that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("Page must be a positive integer")]
    Page,
    #[error("Page size must be a positive integer")]
    PageSize,
    #[error("Start date must be in format YYYY-MM-DD")]
    StartDate,
}

impl ParamError {
    /// Name of the offending query parameter.
    pub fn parameter(&self) -> &'static str {
        match self {
            ParamError::Page => "page",
            ParamError::PageSize => "pagesize",
            ParamError::StartDate => "start",
        }
    }
}

/// Raw `page`, `pagesize` and `start` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingsQuery {
    pub page: Option<String>,
    pub pagesize: Option<String>,
    pub start: Option<String>,
}

impl ReadingsQuery {
    /// Pick the parameters out of decoded query pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "pagesize" => &mut query.pagesize,
                "start" => &mut query.start,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Validate the raw values into a filter.
    ///
    /// Absent and empty values take their defaults. A page size above
    /// [`MAX_PAGE_SIZE`] is clamped rather than rejected.
    pub fn into_filter(self) -> Result<ReadingsFilter, ParamError> {
        let page = match present(&self.page) {
            Some(raw) => parse_positive(raw).ok_or(ParamError::Page)?,
            None => 1,
        };

        let page_size = match present(&self.pagesize) {
            Some(raw) => {
                let size = parse_positive(raw).ok_or(ParamError::PageSize)?;
                // Clamped to MAX_PAGE_SIZE, so the narrowing never truncates.
                size.min(u64::from(MAX_PAGE_SIZE)) as u32
            }
            None => DEFAULT_PAGE_SIZE,
        };

        let start_date = present(&self.start).map(parse_start_date).transpose()?;

        Ok(ReadingsFilter::new(
            Pagination::new(page, page_size),
            start_date,
        ))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|n| *n > 0)
}

fn parse_start_date(raw: &str) -> Result<NaiveDate, ParamError> {
    // chrono accepts unpadded fields like "2024-1-2"; the format is strict.
    if raw.len() != 10 {
        return Err(ParamError::StartDate);
    }
    NaiveDate::parse_from_str(raw, START_DATE_FORMAT).map_err(|_| ParamError::StartDate)
}
