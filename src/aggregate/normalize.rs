/// Validation of raw telemetry payloads into canonical readings
use log::debug;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::models::{RawRecord, Reading};

// Payload field names as written by the ingest pipeline
const TIMESTAMP_FIELD: &str = "timestamp";
const TEMPERATURE_FIELD: &str = "temperatura";
const HUMIDITY_FIELD: &str = "humedad";

/// Validate raw payload records into Readings, preserving input order
///
/// A record survives iff its timestamp parses as RFC 3339 and its
/// temperature is a finite JSON number. Humidity is validated per-field:
/// a record with unusable humidity is kept with `humidity = None`.
/// Malformed records are dropped silently; the drop count is logged.
pub fn normalize_records(records: &[RawRecord]) -> Vec<Reading> {
    let mut readings = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        match parse_record(record) {
            Some(reading) => readings.push(reading),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(
            "Dropped {} malformed records out of {}",
            dropped,
            records.len()
        );
    }

    readings
}

fn parse_record(record: &Value) -> Option<Reading> {
    let timestamp = record.get(TIMESTAMP_FIELD)?.as_str()?;
    let timestamp = OffsetDateTime::parse(timestamp, &Rfc3339).ok()?;

    let temperature = finite_number(record.get(TEMPERATURE_FIELD)?)?;
    let humidity = record.get(HUMIDITY_FIELD).and_then(finite_number);

    Some(Reading {
        timestamp,
        temperature,
        humidity,
    })
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Sort readings ascending by timestamp
///
/// The sort is stable: readings with equal timestamps keep their input
/// order, which the interval estimator relies on.
pub fn sort_chronological(readings: &mut [Reading]) {
    readings.sort_by_key(|reading| reading.timestamp);
}
