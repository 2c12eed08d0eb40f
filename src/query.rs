//! Temporal point lookup and nearest-satellite search.
//!
//! Both queries are pure reads over a [`RecordSource`]. Neither consults the
//! clock: the instant is always supplied by the caller.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::{haversine_vector, Coordinate};
use crate::store::{RecordFilter, RecordSource, TimeBound};

/// Outcome of a successful nearest-satellite search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Closest {
    pub satellite_id: String,
    pub distance_km: f64,
}

/// Last known position of `satellite_id` at or before `at_time`.
///
/// Returns `None` for an unknown satellite as well as for a satellite first
/// observed after `at_time`.
pub fn get_last_position<S>(
    source: &S,
    satellite_id: &str,
    at_time: DateTime<Utc>,
) -> Option<Coordinate>
where
    S: RecordSource + ?Sized,
{
    let filter = RecordFilter::satellite(satellite_id, TimeBound::AtOrBefore(at_time));
    // max_by_key keeps the last of equal maxima
    source
        .retrieve(&filter)
        .into_iter()
        .max_by_key(|r| r.timestamp)
        .map(|r| r.coordinate())
}

/// Distance from `coordinate` to every satellite observed exactly at
/// `at_time`, in snapshot order.
pub fn snapshot_distances<'a, S>(
    source: &'a S,
    coordinate: &Coordinate,
    at_time: DateTime<Utc>,
) -> Vec<(&'a str, f64)>
where
    S: RecordSource + ?Sized,
{
    let snapshot = source.retrieve(&RecordFilter::at(at_time));
    let points: Vec<Coordinate> = snapshot.iter().map(|r| r.coordinate()).collect();

    snapshot
        .into_iter()
        .map(|r| r.satellite_id.as_str())
        .zip(haversine_vector(coordinate, &points))
        .collect()
}

/// Satellite closest to `coordinate` at exactly `at_time`.
///
/// Fails with [`Error::NoDataForTime`] when nothing at all was observed at
/// `at_time`. Returns `Ok(None)` when the snapshot exists but none of its
/// positions yields a usable distance. Ties go to the first record of the
/// snapshot.
pub fn get_closest_sat<S>(
    source: &S,
    coordinate: &Coordinate,
    at_time: DateTime<Utc>,
) -> Result<Option<Closest>>
where
    S: RecordSource + ?Sized,
{
    let distances = snapshot_distances(source, coordinate, at_time);
    if distances.is_empty() {
        return Err(Error::NoDataForTime(at_time));
    }
    debug!("{} satellites observed at {}", distances.len(), at_time);

    let closest = distances
        .into_iter()
        .filter(|(_, d)| d.is_finite())
        .fold(None, |best: Option<(&str, f64)>, (id, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((id, d)),
        });

    Ok(closest.map(|(id, d)| Closest {
        satellite_id: id.to_string(),
        distance_km: d,
    }))
}
