//! High-level database operations.
//!
//! Handlers call these functions rather than the repository traits directly.
//! Every function normalizes the incoming [`ReadingsFilter`] so backends only
//! ever see a page window inside the supported bounds.

use chrono::NaiveDate;
use log::{debug, warn};

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{RainfallReading, ReadingsFilter, RiverReading, Station};

/// Check that the repository backend is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    let healthy = repo.health_check().await?;
    if !healthy {
        warn!("Repository health check reported an unhealthy backend");
    }
    Ok(healthy)
}

/// Fetch one page of river readings.
pub async fn get_river_readings<R: FullRepository + ?Sized>(
    repo: &R,
    filter: ReadingsFilter,
) -> RepositoryResult<Vec<RiverReading>> {
    let filter = filter.normalized();
    debug!(
        "Fetching river readings page={} page_size={} start_date={:?}",
        filter.pagination.page, filter.pagination.page_size, filter.start_date
    );
    repo.get_river_readings(&filter).await
}

pub async fn count_river_readings<R: FullRepository + ?Sized>(
    repo: &R,
    start_date: Option<NaiveDate>,
) -> RepositoryResult<u64> {
    repo.count_river_readings(start_date).await
}

/// Look up a station by its public name.
pub async fn get_station<R: FullRepository + ?Sized>(
    repo: &R,
    station_name: &str,
) -> RepositoryResult<Station> {
    repo.get_station_by_name(station_name).await
}

/// Fetch one page of rainfall readings for a named station.
///
/// Backends resolve the station before paging, so an unknown name is
/// reported as not-found even when the requested page would be empty.
pub async fn get_rainfall_readings<R: FullRepository + ?Sized>(
    repo: &R,
    station_name: &str,
    filter: ReadingsFilter,
) -> RepositoryResult<Vec<RainfallReading>> {
    let filter = filter.normalized();
    debug!(
        "Fetching rainfall readings station={} page={} page_size={} start_date={:?}",
        station_name, filter.pagination.page, filter.pagination.page_size, filter.start_date
    );
    repo.get_rainfall_readings(station_name, &filter).await
}

pub async fn count_rainfall_readings<R: FullRepository + ?Sized>(
    repo: &R,
    station_name: &str,
    start_date: Option<NaiveDate>,
) -> RepositoryResult<u64> {
    repo.count_rainfall_readings(station_name, start_date).await
}
