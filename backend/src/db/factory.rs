//! Backend selection.
//!
//! A [`RepositorySelection`] records which backend to run and the settings it
//! needs. It is resolved synchronously from a `repository.toml` or from the
//! environment, then opened into a shared repository handle. The server keeps
//! that handle in its state; nothing here is global.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    Postgres,
    /// In-memory store seeded with the development fixtures
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts `postgres`, `pg` or `local`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` if it parses. Otherwise Postgres when a database URL
    /// is set, else Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

/// A resolved backend choice, ready to open.
#[derive(Debug, Clone)]
pub struct RepositorySelection {
    pub repo_type: RepositoryType,
    /// Present whenever `repo_type` is Postgres and the feature is enabled.
    pub postgres: Option<PostgresConfig>,
}

impl RepositorySelection {
    pub fn local() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            postgres: None,
        }
    }

    /// Resolve from `REPOSITORY_TYPE` and the `PG_*` variables.
    pub fn from_env() -> RepositoryResult<Self> {
        let repo_type = RepositoryType::from_env();
        let postgres = match repo_type {
            RepositoryType::Local => None,
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => {
                Some(PostgresConfig::from_env().map_err(RepositoryError::configuration)?)
            }
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => None,
        };

        Ok(Self {
            repo_type,
            postgres,
        })
    }

    /// Resolve from a parsed `repository.toml`.
    pub fn from_config(config: &RepositoryConfig) -> RepositoryResult<Self> {
        let repo_type = config.repository_type()?;
        #[cfg(feature = "postgres-repo")]
        let postgres = config.to_postgres_config()?;
        #[cfg(not(feature = "postgres-repo"))]
        let postgres = None;

        Ok(Self {
            repo_type,
            postgres,
        })
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        Self::from_config(&RepositoryConfig::from_file(path)?)
    }

    /// Open the selected backend.
    pub async fn open(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.postgres).await
    }
}

/// Opens repository backends.
pub struct RepositoryFactory;

impl RepositoryFactory {
    pub async fn create(
        repo_type: RepositoryType,
        postgres: Option<PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => Self::create_postgres(postgres).await,
        }
    }

    pub fn create_local() -> Arc<dyn FullRepository> {
        info!("Using in-memory repository with development fixtures");
        Arc::new(LocalRepository::with_fixtures())
    }

    #[cfg(feature = "postgres-repo")]
    async fn create_postgres(
        config: Option<PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = config.ok_or_else(|| {
            RepositoryError::configuration("Postgres repository requires database configuration")
        })?;

        // Pool construction and migrations block on network I/O.
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        info!("Using Postgres repository");
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "postgres-repo"))]
    async fn create_postgres(
        _config: Option<PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::configuration(
            "Postgres repository feature not enabled",
        ))
    }
}
