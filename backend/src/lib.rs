//! # Flood API
//!
//! Read-only HTTP API over river-level and rainfall sensor readings.
//!
//! ## Architecture
//!
//! - [`models`]: Reading and station records plus pagination/filter values
//! - [`db`]: Repository traits, Postgres and in-memory backends, service layer
//! - [`http`]: Axum router, handlers, query validation and JSON encoding
//!
//! ## Features
//!
//! - `local-repo` (default): in-memory backend seeded with development fixtures
//! - `postgres-repo`: Postgres backend built on Diesel and r2d2
//! - `http-server` (default): the axum API and the `flood-server` binary

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
