mod aggregate;
mod buffer;
mod config;
mod database;
mod models;
mod utils;

use log::{error, info, warn};
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::time::{sleep, Duration};

use aggregate::{aggregate, normalize_records, sort_chronological, AggregateParams};
use buffer::ReadingBuffer;
use config::{Sector, ServiceConfig};
use database::fetch_sector_readings;
use models::Report;
use utils::{duration_to_seconds, format_date, format_datetime};

const RECENT_BUFFER_CAPACITY: usize = 144; // One day at the 10 minute cadence

async fn main_loop(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting sector climate reporting service");

    let params = AggregateParams {
        chill_threshold: config.chill_threshold,
        max_gap_hours: config.max_gap_hours,
        nominal_interval_hours: config.nominal_interval_hours,
        utc_offset: config.utc_offset,
    };

    let mut recent: HashMap<String, ReadingBuffer> = HashMap::new();

    loop {
        let cycle_start = OffsetDateTime::now_utc();
        let window_start = cycle_start - time::Duration::days(config.window_days);

        info!(
            "Starting report cycle at: {} (window: last {} days)",
            format_datetime(&cycle_start),
            config.window_days
        );

        for sector in &config.sectors {
            let outcome = match fetch_sector_readings(
                &config.database_url,
                &sector.id,
                window_start,
                cycle_start,
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to fetch readings for sector {}: {}", sector.id, e);
                    continue;
                }
            };

            if !outcome.scanned_all {
                warn!(
                    "Sector {}: row scan limit reached, report covers a partial window",
                    sector.id
                );
            }

            let report = aggregate(&outcome.records, &params);
            log_report(sector, outcome.records.len(), &report);

            let buffer = recent
                .entry(sector.id.clone())
                .or_insert_with(|| ReadingBuffer::with_capacity(RECENT_BUFFER_CAPACITY));
            refresh_recent(buffer, &outcome.records);
            log_current_conditions(sector, buffer);
        }

        // Wait until next cycle should start
        let elapsed = duration_to_seconds(OffsetDateTime::now_utc() - cycle_start);
        if elapsed < config.refresh_interval_secs {
            let wait_time = config.refresh_interval_secs - elapsed;
            info!("Waiting {} seconds until next report cycle", wait_time);
            sleep(Duration::from_secs(wait_time)).await;
        }
    }
}

fn log_report(sector: &Sector, fetched: usize, report: &Report) {
    if report.days.is_empty() {
        warn!(
            "No valid readings for sector {} ({} records fetched)",
            sector.label, fetched
        );
        return;
    }

    info!("Daily summary for {} ({} records):", sector.label, fetched);
    for day in &report.days {
        match &day.humidity {
            Some(humidity) => info!(
                "  {}: {} readings, temp {:.1}/{:.1}/{:.1} °C, humidity {:.1}/{:.1}/{:.1} %, chill {:.2} h",
                format_date(&day.date),
                day.reading_count,
                day.temperature.min,
                day.temperature.mean,
                day.temperature.max,
                humidity.min,
                humidity.mean,
                humidity.max,
                day.chill_hours,
            ),
            None => info!(
                "  {}: {} readings, temp {:.1}/{:.1}/{:.1} °C, chill {:.2} h",
                format_date(&day.date),
                day.reading_count,
                day.temperature.min,
                day.temperature.mean,
                day.temperature.max,
                day.chill_hours,
            ),
        }
    }
    info!(
        "  Total chill hours for {}: {:.1}",
        sector.label, report.total_chill_hours
    );
}

/// Feed the sector buffer with readings newer than what it already holds
///
/// Fetch windows overlap between cycles; comparing against the newest
/// buffered timestamp keeps re-fetched readings from being added twice.
fn refresh_recent(buffer: &mut ReadingBuffer, records: &[models::RawRecord]) {
    let mut readings = normalize_records(records);
    sort_chronological(&mut readings);

    let newest_known = buffer.latest().map(|reading| reading.timestamp);
    for reading in readings {
        if newest_known.map_or(true, |t| reading.timestamp > t) {
            buffer.push(reading);
        }
    }
}

fn log_current_conditions(sector: &Sector, buffer: &ReadingBuffer) {
    if let Some(latest) = buffer.latest() {
        match latest.humidity {
            Some(humidity) => info!(
                "  Current conditions for {}: {:.1} °C, {:.1} % RH at {}",
                sector.label,
                latest.temperature,
                humidity,
                format_datetime(&latest.timestamp)
            ),
            None => info!(
                "  Current conditions for {}: {:.1} °C at {}",
                sector.label,
                latest.temperature,
                format_datetime(&latest.timestamp)
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match ServiceConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
