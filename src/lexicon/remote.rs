//! Slang record sources
//!
//! A source only yields raw records; shape validation happens in the store so
//! every source gets the same malformed-record tolerance.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{constants, LexiconConfig};
use crate::error::{KomentarError, KomentarResult};

/// Supplier of `{"text": "slang:formal"}` records
pub trait LexiconSource: Send + Sync {
    /// Human-readable origin, used in logs
    fn describe(&self) -> String;

    fn fetch_records(&self) -> KomentarResult<Vec<Value>>;

    /// Offline sources are expected to be empty; the store does not report
    /// them as a failed fetch
    fn is_offline(&self) -> bool {
        false
    }
}

/// Builds the source selected by the configuration
pub fn source_from_config(config: &LexiconConfig) -> KomentarResult<Box<dyn LexiconSource>> {
    if config.offline {
        return Ok(Box::new(NoRemote));
    }

    if let Some(path) = &config.file {
        return Ok(Box::new(FileSource::new(path)));
    }

    Ok(Box::new(DatasetRowsSource::new(config)?))
}

/// One page of the datasets-server `/rows` endpoint
#[derive(Debug, Deserialize)]
struct RowsPage {
    #[serde(default)]
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: Value,
}

/// Pages through a dataset hosted on the Hugging Face datasets server
pub struct DatasetRowsSource {
    client: Client,
    endpoint: String,
    dataset: String,
    dataset_config: String,
    split: String,
    page_size: usize,
    max_pages: usize,
}

impl DatasetRowsSource {
    pub fn new(config: &LexiconConfig) -> KomentarResult<Self> {
        let client = build_client(config.timeout())?;

        Ok(Self {
            client,
            endpoint: config.rows_endpoint.clone(),
            dataset: config.dataset.clone(),
            dataset_config: config.dataset_config.clone(),
            split: config.split.clone(),
            page_size: config.page_size.clamp(1, constants::MAX_ROWS_PAGE_SIZE),
            max_pages: config.max_pages.max(1),
        })
    }

    fn fetch_page(&self, offset: usize) -> KomentarResult<RowsPage> {
        let offset = offset.to_string();
        let length = self.page_size.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.dataset_config.as_str()),
                ("split", self.split.as_str()),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ])
            .send()?
            .error_for_status()?;

        Ok(response.json::<RowsPage>()?)
    }
}

impl LexiconSource for DatasetRowsSource {
    fn describe(&self) -> String {
        format!("{} ({}/{})", self.dataset, self.dataset_config, self.split)
    }

    fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
        let mut records = Vec::new();

        for page_index in 0..self.max_pages {
            let offset = page_index * self.page_size;
            let page = self
                .fetch_page(offset)
                .map_err(|e| e.with_context(format!("rows offset {}", offset)))?;

            let received = page.rows.len();
            records.extend(page.rows.into_iter().map(|entry| entry.row));

            tracing::debug!(
                "Fetched {} slang rows from {} (offset {})",
                received,
                self.dataset,
                offset
            );

            let exhausted = match page.num_rows_total {
                Some(total) => records.len() >= total,
                None => received < self.page_size,
            };
            if received == 0 || exhausted {
                return Ok(records);
            }
        }

        tracing::warn!(
            "Stopped reading {} after {} pages; remaining rows are ignored",
            self.dataset,
            self.max_pages
        );
        Ok(records)
    }
}

/// Local JSON array or JSON-lines file. Lines that are not JSON are read as
/// bare `slang:formal` text.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LexiconSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| KomentarError::LexiconSource(format!("{}: {}", self.describe(), e)))?;

        if content.trim_start().starts_with('[') {
            let records: Vec<Value> = serde_json::from_str(&content)?;
            return Ok(records);
        }

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                serde_json::from_str::<Value>(line)
                    .unwrap_or_else(|_| serde_json::json!({ "text": line }))
            })
            .collect())
    }
}

/// No remote data; the store uses the built-in table alone
pub struct NoRemote;

impl LexiconSource for NoRemote {
    fn describe(&self) -> String {
        "built-in table only".to_string()
    }

    fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
        Ok(Vec::new())
    }

    fn is_offline(&self) -> bool {
        true
    }
}

pub(crate) fn build_client(timeout: Duration) -> KomentarResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(constants::USER_AGENT)
        .build()
        .map_err(|e| KomentarError::Network(format!("failed to build HTTP client: {}", e)))
}
