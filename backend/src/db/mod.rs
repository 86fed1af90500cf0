//! Database module for flood readings storage.
//!
//! Storage is accessed through the Repository pattern so the Postgres backend
//! and the in-memory backend are interchangeable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http::handlers)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Page window normalization                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼──────────────────┐  ┌─────────▼──────────┐
//! │  Postgres (Diesel)   │  │  Local (in-memory) │
//! └──────────────────────┘  └────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use flood_api::db::{services, RepositorySelection};
//! use flood_api::models::ReadingsFilter;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositorySelection::from_env()?.open().await?;
//!     let readings = services::get_river_readings(repo.as_ref(), ReadingsFilter::default()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use services::{
    count_rainfall_readings, count_river_readings, get_rainfall_readings, get_river_readings,
    get_station, health_check,
};

pub use factory::{RepositoryFactory, RepositorySelection, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FullRepository, RainfallRepository, RepositoryError, RepositoryResult,
    RiverRepository,
};
