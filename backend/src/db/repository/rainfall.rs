//! Rainfall repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{RainfallReading, ReadingsFilter, Station};

/// Read access to rainfall readings and the station directory.
#[async_trait]
pub trait RainfallRepository: Send + Sync {
    /// Look up a station by its public name.
    ///
    /// # Returns
    /// * `Ok(Station)` - The station
    /// * `Err(RepositoryError::NotFound)` - If no station has that name
    async fn get_station_by_name(&self, station_name: &str) -> RepositoryResult<Station>;

    /// Fetch one page of rainfall readings for a station.
    ///
    /// Same ordering, filtering and paging rules as
    /// [`RiverRepository::get_river_readings`](super::RiverRepository::get_river_readings).
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the station does not exist
    async fn get_rainfall_readings(
        &self,
        station_name: &str,
        filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RainfallReading>>;

    /// Count rainfall readings for a station at or after the start of `start_date`.
    async fn count_rainfall_readings(
        &self,
        station_name: &str,
        start_date: Option<NaiveDate>,
    ) -> RepositoryResult<u64>;
}
