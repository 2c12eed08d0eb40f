use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("cannot read \"{0}\", try the 2020-05-19 06:26:10 format")]
    Format(String),
    #[error("\"{0}\" does not name a single instant in {1}")]
    Ambiguous(String, Tz),
}

/// Runtime settings of the command line tool.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw historical dump
    pub data_path: PathBuf,
    /// Normalized store written by `ingest`
    pub store_path: PathBuf,
    /// Zone used to read dates given without an offset
    pub timezone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("starlink_historical_data.json"),
            store_path: PathBuf::from("space.json"),
            timezone: chrono_tz::UTC,
        }
    }
}

impl Config {
    /// Read a user supplied instant, truncated to whole seconds. An empty
    /// input means "not given".
    pub fn parse_time(&self, input: &str) -> Result<Option<DateTime<Utc>>, TimeError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Some(dt.with_timezone(&Utc).trunc_subsecs(0)));
        }
        let naive = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .ok_or_else(|| TimeError::Format(input.to_string()))?;

        self.timezone
            .from_local_datetime(&naive)
            .single()
            .map(|dt| Some(dt.with_timezone(&Utc).trunc_subsecs(0)))
            .ok_or_else(|| TimeError::Ambiguous(input.to_string(), self.timezone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_none() {
        assert_eq!(Config::default().parse_time("  "), Ok(None));
    }

    #[test]
    fn naive_input_is_utc_by_default() {
        let t = Config::default().parse_time("2021-01-26 06:26:10").unwrap().unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 1, 26, 6, 26, 10).unwrap());
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let expected = Utc.with_ymd_and_hms(2021, 1, 26, 6, 26, 10).unwrap();
        let config = Config::default();
        assert_eq!(config.parse_time("2021-01-26T06:26:10.900Z"), Ok(Some(expected)));
        assert_eq!(config.parse_time("2021-01-26 06:26:10.532"), Ok(Some(expected)));
    }

    #[test]
    fn naive_input_follows_timezone() {
        let config = Config {
            timezone: chrono_tz::Europe::Paris,
            ..Config::default()
        };
        let t = config.parse_time("2021-01-26T07:26:10").unwrap().unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 1, 26, 6, 26, 10).unwrap());
    }

    #[test]
    fn bad_inputs() {
        let config = Config {
            timezone: chrono_tz::Europe::Paris,
            ..Config::default()
        };
        assert!(matches!(config.parse_time("now-ish"), Err(TimeError::Format(_))));
        // skipped by the spring DST jump
        assert!(matches!(
            config.parse_time("2021-03-28 02:30:00"),
            Err(TimeError::Ambiguous(..))
        ));
    }
}
