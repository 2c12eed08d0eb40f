use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// One observation of a satellite position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub satellite_id: String,
    /// Second precision, UTC
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
