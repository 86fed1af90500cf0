//! River level repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{ReadingsFilter, RiverReading};

/// Read access to river level readings.
///
/// Implementations must be `Send + Sync` so a single handle can be shared by
/// concurrent requests.
#[async_trait]
pub trait RiverRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Readings ====================

    /// Fetch one page of river readings.
    ///
    /// Readings are ordered by timestamp ascending, ties broken by insertion
    /// order. When `filter.start_date` is set only readings at or after
    /// 00:00:00 UTC of that day are considered. A page past the end of the
    /// data is empty, not an error.
    async fn get_river_readings(
        &self,
        filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RiverReading>>;

    /// Count river readings at or after the start of `start_date`.
    async fn count_river_readings(&self, start_date: Option<NaiveDate>) -> RepositoryResult<u64>;
}
