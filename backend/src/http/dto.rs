//! Data Transfer Objects for the HTTP API.
//!
//! Readings are reshaped here for the wire: timestamps become
//! `YYYY-MM-DDTHH:MM:SS` strings in UTC and levels are rounded to three
//! decimal places.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{RainfallReading, RiverReading};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Round half away from zero to three decimal places.
pub fn round_level(level: f64) -> f64 {
    (level * 1000.0).round() / 1000.0
}

/// Envelope shared by every reading endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingsResponse<T> {
    pub readings: Vec<T>,
}

impl<T> ReadingsResponse<T> {
    pub fn new(readings: Vec<T>) -> Self {
        Self { readings }
    }
}

/// A river level reading as served by `GET /river`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverReadingDto {
    pub timestamp: String,
    pub level: f64,
}

impl From<RiverReading> for RiverReadingDto {
    fn from(reading: RiverReading) -> Self {
        Self {
            timestamp: format_timestamp(&reading.timestamp),
            level: round_level(reading.level),
        }
    }
}

/// A rainfall reading as served by `GET /rainfall/{station}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallReadingDto {
    pub timestamp: String,
    pub level: f64,
    pub station: String,
}

impl From<RainfallReading> for RainfallReadingDto {
    fn from(reading: RainfallReading) -> Self {
        Self {
            timestamp: format_timestamp(&reading.timestamp),
            level: round_level(reading.level),
            station: reading.station_name,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
