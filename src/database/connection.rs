use log::error;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use url::Url;

const MAX_RETRIES: usize = 5;
const WAIT_BETWEEN_RETRIES_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid database URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("sslrootcert parameter missing from database URL")]
    MissingRootCert,
    #[error("TLS setup failed: {0}")]
    Tls(#[from] openssl::error::ErrorStack),
    #[error("Database unavailable after repeated attempts")]
    RetriesExhausted,
}

fn create_tls_connector(sslrootcert_path: &str) -> Result<MakeTlsConnector, FetchError> {
    let mut builder = SslConnector::builder(SslMethod::tls())?;
    builder.set_ca_file(sslrootcert_path)?;
    builder.set_verify(SslVerifyMode::NONE); // TEMPORARY FOR SELF-SIGNED CERTS

    Ok(MakeTlsConnector::new(builder.build()))
}

/// Split the `sslrootcert` query parameter out of the connection URL
///
/// tokio-postgres does not understand `sslrootcert`, so it is extracted
/// here and the remaining query parameters are passed through untouched.
fn split_root_cert(database_url: &str) -> Result<(String, String), FetchError> {
    let url = Url::parse(database_url)?;

    let mut sslrootcert_path = None;
    let mut clean_params = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == "sslrootcert" {
            sslrootcert_path = Some(value.to_string());
        } else {
            clean_params.push((key.into_owned(), value.into_owned()));
        }
    }

    let sslrootcert_path = sslrootcert_path.ok_or(FetchError::MissingRootCert)?;

    let mut clean_url = url;
    clean_url.set_query(None);
    if !clean_params.is_empty() {
        let query = clean_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        clean_url.set_query(Some(&query));
    }

    Ok((clean_url.to_string(), sslrootcert_path))
}

/// Run a query against the telemetry store, retrying transient failures
///
/// Connects fresh for each attempt and drives the connection on a spawned
/// task, as the client requires. Connection and query errors are logged
/// and retried up to MAX_RETRIES; the caller decides what a final failure
/// means for the cycle.
pub async fn query_with_retry<F, Fut, T>(database_url: &str, operation: F) -> Result<T, FetchError>
where
    F: Fn(tokio_postgres::Client) -> Fut,
    Fut: std::future::Future<Output = Result<T, tokio_postgres::Error>>,
{
    let (clean_url, sslrootcert_path) = split_root_cert(database_url)?;
    let connector = create_tls_connector(&sslrootcert_path)?;

    for attempt in 1..=MAX_RETRIES {
        match tokio_postgres::connect(&clean_url, connector.clone()).await {
            Ok((client, connection)) => {
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        error!("Connection error: {}", e);
                    }
                });

                match operation(client).await {
                    Ok(result) => return Ok(result),
                    Err(e) => error!("Attempt {}: query error: {}", attempt, e),
                }
            }
            Err(e) => error!("Attempt {}: connection error: {}", attempt, e),
        }

        if attempt < MAX_RETRIES {
            sleep(Duration::from_secs(WAIT_BETWEEN_RETRIES_SECS)).await;
        }
    }

    Err(FetchError::RetriesExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cert_is_split_from_the_url() {
        let url = "postgres://user:pw@db.example.com:5432/telemetry?sslmode=require&sslrootcert=/etc/certs/ca.pem";

        let (clean, cert) = split_root_cert(url).unwrap();

        assert_eq!(cert, "/etc/certs/ca.pem");
        assert_eq!(
            clean,
            "postgres://user:pw@db.example.com:5432/telemetry?sslmode=require"
        );
    }

    #[test]
    fn query_is_dropped_when_only_the_cert_remains() {
        let url = "postgres://user:pw@db.example.com/telemetry?sslrootcert=ca.pem";

        let (clean, _) = split_root_cert(url).unwrap();

        assert_eq!(clean, "postgres://user:pw@db.example.com/telemetry");
    }

    #[test]
    fn missing_cert_is_an_error() {
        let result = split_root_cert("postgres://user:pw@db.example.com/telemetry");

        assert!(matches!(result, Err(FetchError::MissingRootCert)));
    }

    #[test]
    fn invalid_url_is_an_error() {
        assert!(matches!(
            split_root_cert("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
