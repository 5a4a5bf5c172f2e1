/// Windowed retrieval of raw sector readings from the telemetry store
use futures_util::{pin_mut, TryStreamExt};
use log::debug;
use time::OffsetDateTime;
use tokio_postgres::types::ToSql;

use crate::database::connection::{query_with_retry, FetchError};
use crate::models::RawRecord;

/// Upper bound on rows scanned per cycle; reaching it flags the fetch as partial
const MAX_SCAN_ROWS: usize = 10_000;

const READINGS_QUERY: &str = "SELECT payload FROM sector_readings \
     WHERE sector = $1 AND recorded_at >= $2 AND recorded_at < $3 \
     ORDER BY recorded_at";

/// Result of one windowed fetch
pub struct FetchOutcome {
    /// Raw payloads in recorded order, unvalidated.
    pub records: Vec<RawRecord>,
    /// False when the scan limit cut the window short.
    pub scanned_all: bool,
}

fn slice_iter<'a>(
    params: &'a [&'a (dyn ToSql + Sync)],
) -> impl ExactSizeIterator<Item = &'a dyn ToSql> + 'a {
    params.iter().map(|param| *param as _)
}

/// Fetch the raw reading payloads for one sector and time window
///
/// Rows are streamed rather than collected by the driver so the scan can
/// stop at MAX_SCAN_ROWS; a truncated scan is reported through
/// `scanned_all` instead of being silently presented as complete.
pub async fn fetch_sector_readings(
    database_url: &str,
    sector: &str,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<FetchOutcome, FetchError> {
    // Clone data for move into the retrying closure
    let sector = sector.to_string();

    query_with_retry(database_url, move |client| {
        let sector = sector.clone();
        async move {
            let params: [&(dyn ToSql + Sync); 3] = [&sector, &from, &to];
            let rows = client.query_raw(READINGS_QUERY, slice_iter(&params)).await?;
            pin_mut!(rows);

            let mut records = Vec::new();
            let mut scanned_all = true;
            while let Some(row) = rows.try_next().await? {
                if records.len() >= MAX_SCAN_ROWS {
                    scanned_all = false;
                    break;
                }
                records.push(row.try_get::<_, RawRecord>(0)?);
            }

            debug!(
                "Fetched {} rows for sector {} (scanned_all={})",
                records.len(),
                sector,
                scanned_all
            );

            Ok(FetchOutcome {
                records,
                scanned_all,
            })
        }
    })
    .await
}
