//! Normalization of the raw Starlink historical dump.
//!
//! The dump is a JSON array of objects. Only `id`, `latitude`, `longitude`
//! and `spaceTrack.CREATION_DATE` are kept, everything else is ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use log::{debug, info};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::record::PositionRecord;
use crate::store::RecordStore;

/// One entry of the raw dump, projected to the fields we use.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "spaceTrack")]
    pub space_track: SpaceTrack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceTrack {
    #[serde(rename = "CREATION_DATE", default)]
    pub creation_date: Option<String>,
}

/// Parse a creation date into a whole-second UTC instant.
///
/// Accepts RFC 3339 as well as naive `YYYY-MM-DDTHH:MM:SS[.fff]` (or with a
/// space separator), the latter being read as UTC.
pub fn parse_creation_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
        })?;
    Some(parsed.trunc_subsecs(0))
}

/// Build the record store out of raw entries.
///
/// Entries lacking latitude, longitude or creation date are dropped. Other
/// missing metadata does not disqualify an entry. A creation date that is
/// present but unreadable is an error.
pub fn normalize<I>(entries: I) -> Result<RecordStore>
where
    I: IntoIterator<Item = RawEntry>,
{
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for entry in entries {
        let (Some(latitude), Some(longitude)) = (entry.latitude, entry.longitude) else {
            debug!("{}: no position, dropped", entry.id);
            dropped += 1;
            continue;
        };
        let Some(creation_date) = entry.space_track.creation_date else {
            debug!("{}: no creation date, dropped", entry.id);
            dropped += 1;
            continue;
        };
        let timestamp = parse_creation_date(&creation_date).ok_or_else(|| Error::Timestamp {
            id: entry.id.clone(),
            value: creation_date.clone(),
        })?;
        records.push(PositionRecord {
            satellite_id: entry.id,
            timestamp,
            latitude,
            longitude,
        });
    }

    info!("normalized {} records ({} dropped)", records.len(), dropped);
    Ok(RecordStore::from_records(records))
}

/// Parse raw entries from a JSON reader.
pub fn read_raw<R: Read>(reader: R) -> Result<Vec<RawEntry>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read and normalize a raw dump file.
pub fn load_raw_file(path: impl AsRef<Path>) -> Result<RecordStore> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    normalize(read_raw(reader)?)
}
