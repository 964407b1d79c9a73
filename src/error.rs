use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve one CSV source. The loader turns these into an empty
/// dataset; they never abort a load.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to fetch {url}: {status}")]
    Status { url: String, status: u16 },
    #[error("{0}")]
    Unavailable(String),
}

/// Malformed CSV text for one source.
#[derive(Debug, Error)]
#[error("failed to parse {file_name}: {source}")]
pub struct ParseError {
    pub file_name: String,
    #[source]
    pub source: csv::Error,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
