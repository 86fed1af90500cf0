//! HTTP handlers for the REST API.
//!
//! Each handler validates its query string, delegates to the db service
//! layer and reshapes the result into DTOs.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use tracing::debug;

use super::dto::{HealthResponse, RainfallReadingDto, ReadingsResponse, RiverReadingDto};
use super::error::AppError;
use super::params::ReadingsQuery;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::ReadingsFilter;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Decoded query-string pairs, in request order.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn parse_filter(query: QueryPairs) -> Result<ReadingsFilter, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(ReadingsQuery::from_pairs(pairs).into_filter()?)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Always answers 200; the `database` field reports whether the backing store
/// responded.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected",
        Ok(false) => "disconnected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "error"
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
    }))
}

// =============================================================================
// Readings
// =============================================================================

/// GET /river?page=&pagesize=&start=
pub async fn get_river_readings(
    State(state): State<AppState>,
    query: QueryPairs,
) -> HandlerResult<ReadingsResponse<RiverReadingDto>> {
    let filter = parse_filter(query)?;

    let readings = db_services::get_river_readings(state.repository.as_ref(), filter).await?;
    debug!(count = readings.len(), "Served river readings");

    Ok(Json(ReadingsResponse::new(
        readings.into_iter().map(Into::into).collect(),
    )))
}

/// GET /rainfall/{station}?page=&pagesize=&start=
///
/// Unknown stations yield 404 regardless of the requested page.
pub async fn get_rainfall_readings(
    State(state): State<AppState>,
    Path(station): Path<String>,
    query: QueryPairs,
) -> HandlerResult<ReadingsResponse<RainfallReadingDto>> {
    let filter = parse_filter(query)?;

    let readings =
        db_services::get_rainfall_readings(state.repository.as_ref(), &station, filter).await?;
    debug!(station = %station, count = readings.len(), "Served rainfall readings");

    Ok(Json(ReadingsResponse::new(
        readings.into_iter().map(Into::into).collect(),
    )))
}
