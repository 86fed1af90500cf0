use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{rainfalls, riverlevels, stationnames};
use crate::models::{RainfallReading, RiverReading, Station};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = riverlevels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RiverLevelRow {
    pub timestamp: DateTime<Utc>,
    pub level: f64,
}

impl From<RiverLevelRow> for RiverReading {
    fn from(row: RiverLevelRow) -> Self {
        RiverReading::new(row.timestamp, row.level)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = riverlevels)]
pub struct NewRiverLevelRow {
    pub timestamp: DateTime<Utc>,
    pub level: f64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rainfalls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RainfallRow {
    pub timestamp: DateTime<Utc>,
    pub level: f64,
}

impl RainfallRow {
    pub fn into_reading(self, station_name: &str) -> RainfallReading {
        RainfallReading::new(self.timestamp, self.level, station_name)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rainfalls)]
pub struct NewRainfallRow {
    pub stationid: String,
    pub timestamp: DateTime<Utc>,
    pub level: f64,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = stationnames)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StationRow {
    pub id: String,
    pub name: String,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station::new(row.id, row.name)
    }
}
