use std::env;
use std::str::FromStr;

use thiserror::Error;
use time::UtcOffset;

use crate::aggregate::{
    DEFAULT_CHILL_THRESHOLD, DEFAULT_MAX_GAP_HOURS, DEFAULT_NOMINAL_INTERVAL_HOURS,
    DEFAULT_UTC_OFFSET,
};

const DEFAULT_WINDOW_DAYS: i64 = 7;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 1800; // 30 minutes

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
    #[error("No sectors configured. Please set SECTORS to a comma-separated list of sector ids (optionally id=Label)")]
    NoSectors,
    #[error("Invalid value for {variable}: '{value}'")]
    InvalidValue {
        variable: &'static str,
        value: String,
    },
}

/// One monitored plantation sector
#[derive(Debug, Clone)]
pub struct Sector {
    /// Identifier used in the telemetry store queries.
    pub id: String,
    /// Display name used in report logging.
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub sectors: Vec<Sector>,
    pub chill_threshold: f64,
    pub max_gap_hours: f64,
    pub nominal_interval_hours: f64,
    pub window_days: i64,
    pub utc_offset: UtcOffset,
    pub refresh_interval_secs: u64,
}

impl ServiceConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let sectors = parse_sectors(&env::var("SECTORS").unwrap_or_default());
        if sectors.is_empty() {
            return Err(ConfigError::NoSectors);
        }

        let chill_threshold = parse_or_default("CHILL_THRESHOLD", DEFAULT_CHILL_THRESHOLD)?;
        let max_gap_hours = parse_or_default("MAX_GAP_HOURS", DEFAULT_MAX_GAP_HOURS)?;
        let nominal_interval_hours =
            parse_or_default("NOMINAL_INTERVAL_HOURS", DEFAULT_NOMINAL_INTERVAL_HOURS)?;
        let window_days = parse_or_default("WINDOW_DAYS", DEFAULT_WINDOW_DAYS)?;
        let refresh_interval_secs =
            parse_or_default("REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;

        let utc_offset = match env::var("UTC_OFFSET_HOURS") {
            Ok(raw) => {
                let hours: i8 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    variable: "UTC_OFFSET_HOURS",
                    value: raw.clone(),
                })?;
                UtcOffset::from_hms(hours, 0, 0).map_err(|_| ConfigError::InvalidValue {
                    variable: "UTC_OFFSET_HOURS",
                    value: raw,
                })?
            }
            Err(_) => DEFAULT_UTC_OFFSET,
        };

        Ok(ServiceConfig {
            database_url,
            sectors,
            chill_threshold,
            max_gap_hours,
            nominal_interval_hours,
            window_days,
            utc_offset,
            refresh_interval_secs,
        })
    }
}

fn parse_or_default<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                variable,
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}

/// Parse the SECTORS variable: comma-separated `id` or `id=Label` pairs
fn parse_sectors(raw: &str) -> Vec<Sector> {
    let mut sectors = Vec::new();

    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        match pair.split_once('=') {
            Some((id, label)) => {
                let id = id.trim();
                let label = label.trim();
                if !id.is_empty() {
                    sectors.push(Sector {
                        id: id.to_string(),
                        label: if label.is_empty() {
                            id.to_string()
                        } else {
                            label.to_string()
                        },
                    });
                }
            }
            None => sectors.push(Sector {
                id: pair.to_string(),
                label: pair.to_string(),
            }),
        }
    }

    sectors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ids_become_their_own_labels() {
        let sectors = parse_sectors("norte,sur");

        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].id, "norte");
        assert_eq!(sectors[0].label, "norte");
        assert_eq!(sectors[1].id, "sur");
    }

    #[test]
    fn labelled_pairs_are_split() {
        let sectors = parse_sectors("norte=Sector Norte, sur = Sector Sur");

        assert_eq!(sectors[0].label, "Sector Norte");
        assert_eq!(sectors[1].id, "sur");
        assert_eq!(sectors[1].label, "Sector Sur");
    }

    #[test]
    fn empty_and_malformed_entries_are_skipped() {
        let sectors = parse_sectors(" , norte,, =sin-id ,sur= ");

        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].id, "norte");
        assert_eq!(sectors[1].id, "sur");
        assert_eq!(sectors[1].label, "sur");
    }

    #[test]
    fn empty_input_gives_no_sectors() {
        assert!(parse_sectors("").is_empty());
    }
}
