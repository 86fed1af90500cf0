//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Readings are kept in
//! insertion order and sorted at query time with a stable sort, so readings
//! that share a timestamp come back in the order they were inserted.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{
    start_of_day, Pagination, RainfallReading, ReadingsFilter, RiverReading, Station,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use flood_api::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::with_fixtures();
/// assert_eq!(repo.river_reading_count(), 5);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct StoredRainfall {
    station_id: String,
    timestamp: DateTime<Utc>,
    level: f64,
}

struct LocalData {
    river: Vec<RiverReading>,
    rainfall: Vec<StoredRainfall>,
    // keyed by station name
    stations: HashMap<String, Station>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            river: Vec::new(),
            rainfall: Vec::new(),
            stations: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository seeded with the development fixtures.
    ///
    /// River: five hourly-ish readings from 2024-01-01T09:00Z (levels 1.2,
    /// 1.3, 1.4, 1.5, 1.1; the last one on 2024-01-02). Rainfall: three
    /// readings for `catcleugh`, two for `haltwhistle`, and a directory of
    /// eleven stations.
    pub fn with_fixtures() -> Self {
        let repo = Self::new();

        for (station_id, name) in FIXTURE_STATIONS {
            repo.insert_station(Station::new(*station_id, *name));
        }

        for (day, hour, level) in [
            (1, 9, 1.2),
            (1, 10, 1.3),
            (1, 11, 1.4),
            (1, 12, 1.5),
            (2, 9, 1.1),
        ] {
            repo.insert_river_reading(RiverReading::new(fixture_time(day, hour), level));
        }

        for (name, hour, level) in [
            ("catcleugh", 9, 2.1),
            ("catcleugh", 10, 2.2),
            ("catcleugh", 11, 2.3),
            ("haltwhistle", 9, 1.5),
            ("haltwhistle", 10, 1.6),
        ] {
            repo.insert_rainfall_reading(name, fixture_time(1, hour), level);
        }

        repo
    }

    /// Add a station to the directory, replacing any station with the same name.
    pub fn insert_station(&self, station: Station) {
        let mut data = self.data.write();
        data.stations.insert(station.name.clone(), station);
    }

    pub fn insert_river_reading(&self, reading: RiverReading) {
        self.data.write().river.push(reading);
    }

    /// Record a rainfall reading for a station that is already in the directory.
    ///
    /// Returns `false` (and stores nothing) when the station is unknown.
    pub fn insert_rainfall_reading(
        &self,
        station_name: &str,
        timestamp: DateTime<Utc>,
        level: f64,
    ) -> bool {
        let mut data = self.data.write();
        let Some(station_id) = data.stations.get(station_name).map(|s| s.id.clone()) else {
            return false;
        };
        data.rainfall.push(StoredRainfall {
            station_id,
            timestamp,
            level,
        });
        true
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every query fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn river_reading_count(&self) -> usize {
        self.data.read().river.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn station_or_not_found(
        data: &LocalData,
        station_name: &str,
        operation: &str,
    ) -> RepositoryResult<Station> {
        data.stations.get(station_name).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Station '{}' not found", station_name),
                ErrorContext::new(operation)
                    .with_entity("station")
                    .with_entity_id(station_name),
            )
        })
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

const FIXTURE_STATIONS: &[(&str, &str)] = &[
    ("010660", "catcleugh"),
    ("014555", "haltwhistle"),
    ("016140", "hexham-firtrees"),
    ("008850", "kielder-ridge-end"),
    ("010312", "chirdon"),
    ("013045", "garrigill-noonstones-hill"),
    ("013336", "hartside"),
    ("013553", "alston"),
    ("013878", "knarsdale"),
    ("015313", "acomb-codlaw-hill"),
    ("015347", "allenheads-allen-lodge"),
];

fn fixture_time(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn on_or_after(timestamp: &DateTime<Utc>, start: Option<DateTime<Utc>>) -> bool {
    start.map_or(true, |s| *timestamp >= s)
}

/// Stable-sort by timestamp and cut out the requested page.
fn paginate<T>(
    mut items: Vec<T>,
    pagination: Pagination,
    key: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl RiverRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_river_readings(
        &self,
        filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RiverReading>> {
        self.check_health()?;
        let start = filter.start_instant();

        let data = self.data.read();
        let matching: Vec<RiverReading> = data
            .river
            .iter()
            .filter(|r| on_or_after(&r.timestamp, start))
            .cloned()
            .collect();

        Ok(paginate(matching, filter.pagination, |r| r.timestamp))
    }

    async fn count_river_readings(&self, start_date: Option<NaiveDate>) -> RepositoryResult<u64> {
        self.check_health()?;
        let start = start_date.map(start_of_day);

        let data = self.data.read();
        let count = data
            .river
            .iter()
            .filter(|r| on_or_after(&r.timestamp, start))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl RainfallRepository for LocalRepository {
    async fn get_station_by_name(&self, station_name: &str) -> RepositoryResult<Station> {
        self.check_health()?;
        let data = self.data.read();
        Self::station_or_not_found(&data, station_name, "get_station_by_name")
    }

    async fn get_rainfall_readings(
        &self,
        station_name: &str,
        filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RainfallReading>> {
        self.check_health()?;
        let start = filter.start_instant();

        let data = self.data.read();
        let station = Self::station_or_not_found(&data, station_name, "get_rainfall_readings")?;

        let matching: Vec<RainfallReading> = data
            .rainfall
            .iter()
            .filter(|r| r.station_id == station.id && on_or_after(&r.timestamp, start))
            .map(|r| RainfallReading::new(r.timestamp, r.level, station.name.clone()))
            .collect();

        Ok(paginate(matching, filter.pagination, |r| r.timestamp))
    }

    async fn count_rainfall_readings(
        &self,
        station_name: &str,
        start_date: Option<NaiveDate>,
    ) -> RepositoryResult<u64> {
        self.check_health()?;
        let start = start_date.map(start_of_day);

        let data = self.data.read();
        let station = Self::station_or_not_found(&data, station_name, "count_rainfall_readings")?;

        let count = data
            .rainfall
            .iter()
            .filter(|r| r.station_id == station.id && on_or_after(&r.timestamp, start))
            .count();
        Ok(count as u64)
    }
}
