//! # Starlink history
//!
//! Queries over a static dump of historical Starlink positions:
//! - the last known position of a satellite at or before an instant
//! - the satellite closest to a coordinate at an exact instant
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use starlink_history::{get_last_position, Coordinate, PositionRecord, RecordStore};
//!
//! let t = Utc.with_ymd_and_hms(2021, 1, 26, 6, 26, 10).unwrap();
//! let store = RecordStore::from_records(vec![PositionRecord {
//!     satellite_id: "5f36cb59bd88830006274090".to_string(),
//!     timestamp: t,
//!     latitude: -42.09235170986195,
//!     longitude: 94.0,
//! }]);
//!
//! assert_eq!(
//!     get_last_position(&store, "5f36cb59bd88830006274090", t),
//!     Some(Coordinate::new(-42.09235170986195, 94.0))
//! );
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod query;
pub mod record;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use geo::{haversine, haversine_vector, Coordinate, EARTH_RADIUS_KM};
pub use query::{get_closest_sat, get_last_position, snapshot_distances, Closest};
pub use record::PositionRecord;
pub use store::{RecordFilter, RecordSource, RecordStore, TimeBound};
