//! Where the CSV text comes from.
//!
//! The loader only needs "give me the text of this file"; a directory on disk
//! and a static-file HTTP server are the two places the exports live.

use std::path::{Path, PathBuf};

use log::debug;
use reqwest::blocking::Client;

use crate::error::FetchError;

/// A provider of raw CSV text by file name. Shared across the loader's
/// worker threads.
pub trait CsvSource: Sync {
    fn fetch(&self, file_name: &str) -> Result<String, FetchError>;
}

impl<T: CsvSource + ?Sized> CsvSource for Box<T> {
    fn fetch(&self, file_name: &str) -> Result<String, FetchError> {
        (**self).fetch(file_name)
    }
}

/// Files under a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CsvSource for DirSource {
    fn fetch(&self, file_name: &str) -> Result<String, FetchError> {
        let path = self.root.join(file_name);
        debug!("reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })
    }
}

/// Files served next to the dashboard, fetched with a blocking GET.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file_name)
    }
}

impl CsvSource for HttpSource {
    fn fetch(&self, file_name: &str) -> Result<String, FetchError> {
        let url = self.url_for(file_name);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .text()
            .map_err(|source| FetchError::Http { url, source })
    }
}
