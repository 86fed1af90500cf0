//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Parameterized queries built with the Diesel query builder
//! - Connection health monitoring and query counters
//! - Optional embedded migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum idle connections (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection checkout timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 1800)
//! - `PG_MAX_LIFETIME_SEC`: Maximum connection lifetime in seconds (default: 3600)
//! - `PG_RUN_MIGRATIONS`: Apply embedded migrations on startup (default: true)
//!
//! Failures are never retried here; a failing store surfaces to the caller.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, RainfallRepository, RepositoryError, RepositoryResult, RiverRepository,
};
use crate::models::{start_of_day, Pagination, RainfallReading, ReadingsFilter, RiverReading, Station};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept in the pool
    pub min_pool_size: u32,
    /// Connection checkout timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum connection lifetime in seconds
    pub max_lifetime_sec: u64,
    /// Apply embedded migrations when the repository is created
    pub run_migrations: bool,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 1800,
            max_lifetime_sec: 3600,
            run_migrations: true,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset or unparsable optional variables fall back to their defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_lifetime_sec: env_or("PG_MAX_LIFETIME_SEC", defaults.max_lifetime_sec),
            run_migrations: env_or("PG_RUN_MIGRATIONS", defaults.run_migrations),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
}

/// Diesel-backed repository for Postgres.
///
/// Cloning is cheap; clones share the pool and counters.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository, optionally running pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool cannot be built or migrations fail
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .max_lifetime(Some(Duration::from_secs(config.max_lifetime_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        if config.run_migrations {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        log::info!(
            "Postgres pool ready (max_size={}, min_idle={})",
            config.max_pool_size,
            config.min_pool_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run a blocking Diesel operation on a pooled connection.
    ///
    /// The closure runs on the blocking thread pool so it never stalls the
    /// async executor.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new(operation).with_details("get_connection"),
                )
            })?;

            total_queries.fetch_add(1, Ordering::Relaxed);
            f(&mut conn).map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                e.with_operation(operation)
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new(operation).with_details("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }

    // ==================== Fixture loading ====================
    //
    // The HTTP API never writes. These exist so integration tests and local
    // tooling can load data through the same pool.

    /// Insert a station, ignoring it if the id already exists.
    pub async fn insert_station(&self, station: Station) -> RepositoryResult<()> {
        self.with_conn("insert_station", move |conn| {
            diesel::insert_into(stationnames::table)
                .values(StationRow {
                    id: station.id,
                    name: station.name,
                })
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    pub async fn insert_river_readings(&self, readings: Vec<RiverReading>) -> RepositoryResult<usize> {
        let rows: Vec<NewRiverLevelRow> = readings
            .into_iter()
            .map(|r| NewRiverLevelRow {
                timestamp: r.timestamp,
                level: r.level,
            })
            .collect();

        self.with_conn("insert_river_readings", move |conn| {
            diesel::insert_into(riverlevels::table)
                .values(&rows)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    /// Insert rainfall readings for the station with the given sensor id.
    pub async fn insert_rainfall_readings(
        &self,
        station_id: &str,
        readings: Vec<(DateTime<Utc>, f64)>,
    ) -> RepositoryResult<usize> {
        let rows: Vec<NewRainfallRow> = readings
            .into_iter()
            .map(|(timestamp, level)| NewRainfallRow {
                stationid: station_id.to_string(),
                timestamp,
                level,
            })
            .collect();

        self.with_conn("insert_rainfall_readings", move |conn| {
            diesel::insert_into(rainfalls::table)
                .values(&rows)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    /// Delete every station and reading.
    pub async fn clear(&self) -> RepositoryResult<()> {
        self.with_conn("clear", |conn| {
            conn.transaction(|conn| {
                diesel::delete(rainfalls::table).execute(conn)?;
                diesel::delete(riverlevels::table).execute(conn)?;
                diesel::delete(stationnames::table).execute(conn)?;
                Ok::<_, diesel::result::Error>(())
            })
            .map_err(map_diesel_error)
        })
        .await
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// LIMIT/OFFSET as Postgres BIGINTs. Offsets beyond `i64::MAX` saturate,
/// which still yields an empty page.
fn page_bounds(pagination: &Pagination) -> (i64, i64) {
    let limit = i64::from(pagination.page_size);
    let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn find_station(conn: &mut PgConnection, station_name: &str) -> RepositoryResult<StationRow> {
    stationnames::table
        .filter(stationnames::name.eq(station_name))
        .select(StationRow::as_select())
        .first(conn)
        .optional()
        .map_err(map_diesel_error)?
        .ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Station '{}' not found", station_name),
                ErrorContext::default()
                    .with_entity("station")
                    .with_entity_id(station_name),
            )
        })
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl RiverRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn).map_err(map_diesel_error)?;
            Ok(true)
        })
        .await
    }

    async fn get_river_readings(
        &self,
        filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RiverReading>> {
        let start = filter.start_instant();
        let (limit, offset) = page_bounds(&filter.pagination);

        self.with_conn("get_river_readings", move |conn| {
            let mut query = riverlevels::table.into_boxed();
            if let Some(start) = start {
                query = query.filter(riverlevels::timestamp.ge(start));
            }

            let rows = query
                .select(RiverLevelRow::as_select())
                .order((riverlevels::timestamp.asc(), riverlevels::id.asc()))
                .limit(limit)
                .offset(offset)
                .load::<RiverLevelRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(RiverReading::from).collect())
        })
        .await
    }

    async fn count_river_readings(&self, start_date: Option<NaiveDate>) -> RepositoryResult<u64> {
        let start = start_date.map(start_of_day);

        self.with_conn("count_river_readings", move |conn| {
            let mut query = riverlevels::table.into_boxed();
            if let Some(start) = start {
                query = query.filter(riverlevels::timestamp.ge(start));
            }

            let count: i64 = query.count().get_result(conn).map_err(map_diesel_error)?;
            Ok(to_count(count))
        })
        .await
    }
}

#[async_trait]
impl RainfallRepository for PostgresRepository {
    async fn get_station_by_name(&self, station_name: &str) -> RepositoryResult<Station> {
        let station_name = station_name.to_string();
        self.with_conn("get_station_by_name", move |conn| {
            find_station(conn, &station_name).map(Station::from)
        })
        .await
    }

    async fn get_rainfall_readings(
        &self,
        station_name: &str,
        filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RainfallReading>> {
        let station_name = station_name.to_string();
        let start = filter.start_instant();
        let (limit, offset) = page_bounds(&filter.pagination);

        self.with_conn("get_rainfall_readings", move |conn| {
            let station = find_station(conn, &station_name)?;

            let mut query = rainfalls::table
                .filter(rainfalls::stationid.eq(station.id))
                .into_boxed();
            if let Some(start) = start {
                query = query.filter(rainfalls::timestamp.ge(start));
            }

            let rows = query
                .select(RainfallRow::as_select())
                .order((rainfalls::timestamp.asc(), rainfalls::id.asc()))
                .limit(limit)
                .offset(offset)
                .load::<RainfallRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows
                .into_iter()
                .map(|row| row.into_reading(&station.name))
                .collect())
        })
        .await
    }

    async fn count_rainfall_readings(
        &self,
        station_name: &str,
        start_date: Option<NaiveDate>,
    ) -> RepositoryResult<u64> {
        let station_name = station_name.to_string();
        let start = start_date.map(start_of_day);

        self.with_conn("count_rainfall_readings", move |conn| {
            let station = find_station(conn, &station_name)?;

            let mut query = rainfalls::table
                .filter(rainfalls::stationid.eq(station.id))
                .into_boxed();
            if let Some(start) = start {
                query = query.filter(rainfalls::timestamp.ge(start));
            }

            let count: i64 = query.count().get_result(conn).map_err(map_diesel_error)?;
            Ok(to_count(count))
        })
        .await
    }
}
