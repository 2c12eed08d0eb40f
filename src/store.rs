//! Record store and the retrieval contract the query engine relies on.
//!
//! The store is rebuilt wholesale on every load. Records are kept in ascending
//! timestamp order, ties in input order, so any per-satellite view is
//! chronological as well.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::record::PositionRecord;

/// Time constraint of a [`RecordFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    Any,
    Exactly(DateTime<Utc>),
    AtOrBefore(DateTime<Utc>),
}

impl TimeBound {
    fn accepts(&self, t: &DateTime<Utc>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(bound) => t == bound,
            Self::AtOrBefore(bound) => t <= bound,
        }
    }
}

/// Selection over the stored records.
#[derive(Debug, Clone, Copy)]
pub struct RecordFilter<'a> {
    /// Exact, case-sensitive match
    pub satellite_id: Option<&'a str>,
    pub time: TimeBound,
}

impl<'a> RecordFilter<'a> {
    pub fn all() -> Self {
        Self {
            satellite_id: None,
            time: TimeBound::Any,
        }
    }

    pub fn satellite(satellite_id: &'a str, time: TimeBound) -> Self {
        Self {
            satellite_id: Some(satellite_id),
            time,
        }
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            satellite_id: None,
            time: TimeBound::Exactly(time),
        }
    }

    pub fn matches(&self, record: &PositionRecord) -> bool {
        self.satellite_id
            .map_or(true, |id| record.satellite_id == id)
            && self.time.accepts(&record.timestamp)
    }
}

/// Anything the query engine can read position records from.
///
/// Implementations return matches in ascending timestamp order.
pub trait RecordSource {
    fn retrieve(&self, filter: &RecordFilter<'_>) -> Vec<&PositionRecord>;
}

/// Immutable, time-ordered collection of position records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PositionRecord>,
}

impl RecordStore {
    /// Build a store, truncating timestamps to whole seconds and sorting
    /// them (stable) in ascending order.
    pub fn from_records(mut records: Vec<PositionRecord>) -> Self {
        for record in records.iter_mut() {
            record.timestamp = record.timestamp.trunc_subsecs(0);
        }
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    /// Load a store previously written by [`RecordStore::save`].
    ///
    /// Timestamps are truncated to whole seconds, the order is checked but
    /// not repaired.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut records: Vec<PositionRecord> = serde_json::from_reader(reader)?;
        for record in records.iter_mut() {
            record.timestamp = record.timestamp.trunc_subsecs(0);
        }

        if let Some(i) = records
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
        {
            return Err(Error::UnorderedStore(i + 1));
        }

        info!("loaded {} records from {}", records.len(), path.display());
        Ok(Self { records })
    }

    /// Write the whole collection to `path`, replacing any previous content.
    ///
    /// The data goes to a sibling temporary file first and is renamed over
    /// `path`, so readers never observe a partially written store.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");

        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &self.records)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;

        info!("saved {} records to {}", self.records.len(), path.display());
        Ok(())
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct satellite ids, sorted.
    pub fn satellite_ids(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.satellite_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct observation timestamps, ascending.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        let mut out: Vec<DateTime<Utc>> = self.records.iter().map(|r| r.timestamp).collect();
        out.dedup();
        out
    }

    /// First and last observation timestamps.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.records.first()?.timestamp, self.records.last()?.timestamp))
    }
}

impl RecordSource for RecordStore {
    fn retrieve(&self, filter: &RecordFilter<'_>) -> Vec<&PositionRecord> {
        match filter.time {
            // records are sorted: bail out of the scan once past the bound
            TimeBound::AtOrBefore(bound) => self
                .records
                .iter()
                .take_while(|r| r.timestamp <= bound)
                .filter(|r| filter.matches(r))
                .collect(),
            TimeBound::Exactly(at) => {
                let start = self.records.partition_point(|r| r.timestamp < at);
                self.records[start..]
                    .iter()
                    .take_while(|r| r.timestamp == at)
                    .filter(|r| filter.matches(r))
                    .collect()
            }
            TimeBound::Any => self.records.iter().filter(|r| filter.matches(r)).collect(),
        }
    }
}
