//! Sensor reading records.
//!
//! Readings are read-only projections of stored rows. Levels are kept at full
//! precision here; rounding for presentation happens in the HTTP DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single river level measurement, in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverReading {
    pub timestamp: DateTime<Utc>,
    pub level: f64,
}

impl RiverReading {
    pub fn new(timestamp: DateTime<Utc>, level: f64) -> Self {
        Self { timestamp, level }
    }
}

/// A single rainfall measurement attributed to a named station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallReading {
    pub timestamp: DateTime<Utc>,
    pub level: f64,
    pub station_name: String,
}

impl RainfallReading {
    pub fn new(timestamp: DateTime<Utc>, level: f64, station_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            station_name: station_name.into(),
        }
    }
}
