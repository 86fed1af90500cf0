//! HTTP server module for the flood readings API.
//!
//! An axum-based REST API over the db service layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query-string validation (params.rs)                    │
//! │  - JSON encoding (dto.rs) and error mapping (error.rs)    │
//! │  - Timeout, CORS, compression, request tracing            │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db::services)                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! - `GET /river?page=&pagesize=&start=`
//! - `GET /rainfall/{station}?page=&pagesize=&start=`
//! - `GET /health`

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod params;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::{create_router, create_router_with_timeout};
pub use state::AppState;
