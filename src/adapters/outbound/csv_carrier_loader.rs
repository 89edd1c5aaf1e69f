//! CSV Carrier Loader
//!
//! Loads the carrier dataset from a local CSV file or an HTTP(S) URL.
//! Rows with a broken record are skipped; rows with unusable coordinates
//! are kept without a location so they rank last.

use crate::domain::entities::Carrier;
use crate::domain::value_objects::GeoPoint;
use std::borrow::Cow;

const NAME_COLUMNS: &[&str] = &["carrier_name", "name", "carrier"];
const STATE_COLUMNS: &[&str] = &["state"];
const ADDRESS_COLUMNS: &[&str] = &["address"];
const LAT_COLUMNS: &[&str] = &["lat", "latitude"];
const LON_COLUMNS: &[&str] = &["long", "lng", "lon", "longitude"];

const GITHUB_PREFIX: &str = "https://github.com/";
const RAW_GITHUB_PREFIX: &str = "https://raw.githubusercontent.com/";

/// Dataset ingestion failure.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dataset source returned HTTP {0}")]
    HttpStatus(u16),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no {0} column")]
    MissingColumn(&'static str),
}

/// Result of one dataset load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub carriers: Vec<Carrier>,
    /// Rows dropped because the record itself was broken
    pub skipped_rows: usize,
    /// Carriers kept without a usable location
    pub missing_locations: usize,
}

/// Loader for CSV carrier datasets.
pub struct CsvCarrierLoader {
    client: reqwest::Client,
}

impl CsvCarrierLoader {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Load carriers from `source`, a file path or an `http(s)://` URL.
    pub async fn load(&self, source: &str) -> Result<LoadReport, IngestError> {
        let bytes = if is_remote(source) {
            self.fetch(source).await?
        } else {
            tokio::fs::read(source).await.map_err(|e| IngestError::Io {
                path: source.to_string(),
                source: e,
            })?
        };

        let report = parse_carriers(&bytes)?;
        tracing::info!(
            source,
            carriers = report.carriers.len(),
            skipped = report.skipped_rows,
            missing_locations = report.missing_locations,
            "carrier dataset loaded"
        );
        Ok(report)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let url = raw_content_url(url);
        tracing::debug!("fetching dataset from {}", url);

        let response = self.client.get(&*url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::HttpStatus(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for CsvCarrierLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Rewrite a GitHub "blob" page URL to its raw-content equivalent.
///
/// `https://github.com/o/r/blob/main/d.csv` becomes
/// `https://raw.githubusercontent.com/o/r/main/d.csv`. Other URLs are
/// returned unchanged.
pub fn raw_content_url(url: &str) -> Cow<'_, str> {
    let Some(rest) = url.strip_prefix(GITHUB_PREFIX) else {
        return Cow::Borrowed(url);
    };
    match rest.split_once("/blob/") {
        Some((repo, path)) if repo.split('/').count() == 2 => {
            Cow::Owned(format!("{}{}/{}", RAW_GITHUB_PREFIX, repo, path))
        }
        _ => Cow::Borrowed(url),
    }
}

/// Decode dataset bytes as UTF-8, falling back to ISO-8859-1.
pub fn decode_dataset(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => {
            tracing::debug!("dataset is not valid UTF-8, decoding as ISO-8859-1");
            // every Latin-1 byte is the code point of the same value
            Cow::Owned(bytes.iter().map(|&b| b as char).collect())
        }
    }
}

/// Parse a CSV dataset into carriers.
pub fn parse_carriers(bytes: &[u8]) -> Result<LoadReport, IngestError> {
    let text = decode_dataset(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?;
    let width = headers.len();
    let columns = Columns::resolve(headers)?;
    let mut report = LoadReport::default();

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                // header is line 1
                tracing::warn!(row = index + 2, "skipping malformed row: {}", e);
                report.skipped_rows += 1;
                continue;
            }
        };
        // short rows are padded with empty fields, long rows are rejected
        if record.len() > width {
            tracing::warn!(
                row = index + 2,
                "skipping malformed row: expected {} fields, found {}",
                width,
                record.len()
            );
            report.skipped_rows += 1;
            continue;
        }

        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or_default();
        let location = parse_location(field(Some(columns.lat)), field(Some(columns.lon)));
        if location.is_none() {
            tracing::debug!(row = index + 2, "row has no usable coordinates");
            report.missing_locations += 1;
        }

        report.carriers.push(Carrier::new(
            field(Some(columns.name)),
            field(columns.state),
            field(columns.address),
            location,
        ));
    }

    Ok(report)
}

fn parse_location(lat: &str, lon: &str) -> Option<GeoPoint> {
    let lat = lat.parse::<f64>().ok()?;
    let lon = lon.parse::<f64>().ok()?;
    GeoPoint::new(lat, lon).ok()
}

/// Column positions resolved from the header row.
struct Columns {
    name: usize,
    state: Option<usize>,
    address: Option<usize>,
    lat: usize,
    lon: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
        };

        Ok(Self {
            name: find(NAME_COLUMNS).ok_or(IngestError::MissingColumn("carrier_name"))?,
            state: find(STATE_COLUMNS),
            address: find(ADDRESS_COLUMNS),
            lat: find(LAT_COLUMNS).ok_or(IngestError::MissingColumn("lat"))?,
            lon: find(LON_COLUMNS).ok_or(IngestError::MissingColumn("long"))?,
        })
    }
}
