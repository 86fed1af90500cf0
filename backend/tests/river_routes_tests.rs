//! End-to-end tests for `GET /river` against the in-memory fixtures.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{NaiveDate, TimeZone, Utc};
use flood_api::db::{
    FullRepository, LocalRepository, RainfallRepository, RepositoryResult, RiverRepository,
};
use flood_api::http::{create_router_with_timeout, AppState};
use flood_api::models::{RainfallReading, ReadingsFilter, RiverReading, Station};
use support::http::{app_with, fixture_app, get_json, levels, readings, timestamps};

#[tokio::test]
async fn test_river_default_page_returns_all_fixtures_in_order() {
    let (status, body) = get_json(fixture_app(), "/river").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body), vec![1.2, 1.3, 1.4, 1.5, 1.1]);
    assert_eq!(
        timestamps(&body),
        vec![
            "2024-01-01T09:00:00",
            "2024-01-01T10:00:00",
            "2024-01-01T11:00:00",
            "2024-01-01T12:00:00",
            "2024-01-02T09:00:00",
        ]
    );
}

#[tokio::test]
async fn test_river_first_page() {
    let (status, body) = get_json(fixture_app(), "/river?page=1&pagesize=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body), vec![1.2, 1.3]);
}

#[tokio::test]
async fn test_river_last_partial_page() {
    let (status, body) = get_json(fixture_app(), "/river?page=3&pagesize=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body), vec![1.1]);
    assert_eq!(timestamps(&body), vec!["2024-01-02T09:00:00"]);
}

#[tokio::test]
async fn test_river_page_past_end_is_empty() {
    let (status, body) = get_json(fixture_app(), "/river?page=10&pagesize=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "readings": [] }));
}

#[tokio::test]
async fn test_river_reading_shape() {
    let (_, body) = get_json(fixture_app(), "/river?pagesize=1").await;

    assert_eq!(
        readings(&body)[0],
        serde_json::json!({ "timestamp": "2024-01-01T09:00:00", "level": 1.2 })
    );
}

#[tokio::test]
async fn test_river_start_date_in_future_is_empty() {
    let (status, body) = get_json(fixture_app(), "/river?start=2025-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert!(readings(&body).is_empty());
}

#[tokio::test]
async fn test_river_start_date_is_inclusive_from_midnight() {
    let (status, body) = get_json(fixture_app(), "/river?start=2024-01-02").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body), vec![1.1]);

    let (_, body) = get_json(fixture_app(), "/river?start=2024-01-01").await;
    assert_eq!(levels(&body).len(), 5);
}

#[tokio::test]
async fn test_river_start_date_combines_with_pagination() {
    let (_, body) = get_json(fixture_app(), "/river?start=2024-01-01&page=2&pagesize=3").await;
    assert_eq!(levels(&body), vec![1.5, 1.1]);
}

#[tokio::test]
async fn test_river_oversized_page_size_is_clamped() {
    let (status, body) = get_json(fixture_app(), "/river?pagesize=100000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body).len(), 5);
}

#[tokio::test]
async fn test_river_rejects_invalid_page() {
    for uri in ["/river?page=0", "/river?page=-1", "/river?page=abc"] {
        let (status, body) = get_json(fixture_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body,
            serde_json::json!({ "error": "Page must be a positive integer" })
        );
    }
}

#[tokio::test]
async fn test_river_rejects_invalid_page_size() {
    for uri in ["/river?pagesize=0", "/river?pagesize=-5", "/river?pagesize=big"] {
        let (status, body) = get_json(fixture_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body,
            serde_json::json!({ "error": "Page size must be a positive integer" })
        );
    }
}

#[tokio::test]
async fn test_river_rejects_malformed_start_date() {
    for uri in ["/river?start=2024-13-01", "/river?start=01-01-2024", "/river?start=2024-1-1"] {
        let (status, body) = get_json(fixture_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body,
            serde_json::json!({ "error": "Start date must be in format YYYY-MM-DD" })
        );
    }
}

#[tokio::test]
async fn test_river_empty_parameters_use_defaults() {
    let (status, body) = get_json(fixture_app(), "/river?page=&pagesize=&start=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body).len(), 5);
}

#[tokio::test]
async fn test_river_levels_rounded_to_three_places() {
    let repo = LocalRepository::new();
    let ts = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    repo.insert_river_reading(RiverReading::new(ts, 0.123456));

    let (_, body) = get_json(app_with(repo), "/river").await;
    assert_eq!(levels(&body), vec![0.123]);
}

#[tokio::test]
async fn test_river_store_failure_is_generic_500() {
    let repo = LocalRepository::with_fixtures();
    repo.set_healthy(false);

    let (status, body) = get_json(app_with(repo), "/river").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_invalid_parameters_short_circuit_before_store() {
    let repo = LocalRepository::with_fixtures();
    repo.set_healthy(false);

    let (status, _) = get_json(app_with(repo), "/river?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_river_repeated_parameters_use_first_value() {
    let (status, body) =
        get_json(fixture_app(), "/river?page=2&page=9&pagesize=2&pagesize=0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body), vec![1.4, 1.5]);

    let (status, body) =
        get_json(fixture_app(), "/river?start=2024-01-02&start=not-a-date").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(levels(&body), vec![1.1]);
}

#[tokio::test]
async fn test_river_repeated_invalid_first_value_is_rejected() {
    let (status, body) = get_json(fixture_app(), "/river?page=0&page=1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        serde_json::json!({ "error": "Page must be a positive integer" })
    );
}

/// Answers every query after a fixed delay.
struct SlowRepository {
    delay: Duration,
}

#[async_trait]
impl RiverRepository for SlowRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn get_river_readings(
        &self,
        _filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RiverReading>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn count_river_readings(&self, _start_date: Option<NaiveDate>) -> RepositoryResult<u64> {
        Ok(0)
    }
}

#[async_trait]
impl RainfallRepository for SlowRepository {
    async fn get_station_by_name(&self, station_name: &str) -> RepositoryResult<Station> {
        Ok(Station::new("000000", station_name))
    }

    async fn get_rainfall_readings(
        &self,
        _station_name: &str,
        _filter: &ReadingsFilter,
    ) -> RepositoryResult<Vec<RainfallReading>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn count_rainfall_readings(
        &self,
        _station_name: &str,
        _start_date: Option<NaiveDate>,
    ) -> RepositoryResult<u64> {
        Ok(0)
    }
}

fn slow_app(delay: Duration, timeout: Duration) -> axum::Router {
    let repo = Arc::new(SlowRepository { delay }) as Arc<dyn FullRepository>;
    create_router_with_timeout(AppState::new(repo), timeout)
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let app = slow_app(Duration::from_millis(500), Duration::from_millis(50));

    let (status, _) = get_json(app.clone(), "/river").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    let (status, _) = get_json(app, "/rainfall/catcleugh").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_request_within_timeout_succeeds() {
    let app = slow_app(Duration::from_millis(10), Duration::from_secs(2));

    let (status, body) = get_json(app, "/river").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "readings": [] }));
}
