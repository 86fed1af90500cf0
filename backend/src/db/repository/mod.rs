//! Repository trait definitions for reading queries.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`river`]: River level readings plus connection health
//! - [`rainfall`]: Rainfall readings and the station directory
//!
//! Both backends (`LocalRepository`, `PostgresRepository`) implement every
//! trait. Code that needs the whole surface should take a [`FullRepository`].

pub mod error;
pub mod rainfall;
pub mod river;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use rainfall::RainfallRepository;
pub use river::RiverRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: RiverRepository + RainfallRepository {}

impl<T> FullRepository for T where T: RiverRepository + RainfallRepository {}
