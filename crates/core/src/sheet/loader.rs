//! Reads the sheet text from a URL or a local file.

use std::{fmt, path::PathBuf};

use tracing::{info, warn};

use crate::error::LoadError;

use super::{models::Sheet, parser::parse_sheet};

/// Where the sheet text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// CSV export endpoint fetched over HTTP(S).
    Url(String),
    /// Local CSV file.
    File(PathBuf),
}

impl fmt::Display for SheetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSource::Url(url) => f.write_str(url),
            SheetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One-shot loader for the passcode sheet.
#[derive(Debug, Clone)]
pub struct SheetLoader {
    source: SheetSource,
    client: reqwest::Client,
}

impl SheetLoader {
    /// Loader reading from `source`.
    pub fn new(source: SheetSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Configured sheet source.
    pub fn source(&self) -> &SheetSource {
        &self.source
    }

    /// Parse already fetched sheet text.
    pub fn parse(text: &str) -> Sheet {
        parse_sheet(text)
    }

    /// Read the raw sheet text. No retries.
    pub async fn fetch(&self) -> Result<String, LoadError> {
        match &self.source {
            SheetSource::Url(url) => {
                let request_error = |source: reqwest::Error| LoadError::Request {
                    url: url.clone(),
                    source,
                };
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(request_error)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await.map_err(request_error)
            }
            SheetSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Read {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    /// Fetch and parse the sheet.
    pub async fn load(&self) -> Result<Sheet, LoadError> {
        let text = self.fetch().await?;
        let sheet = Self::parse(&text);
        if sheet.is_empty() {
            warn!(source = %self.source, "Sheet contains no usable rows");
        }
        info!(
            source = %self.source,
            records = sheet.records.len(),
            fallbacks = sheet.fallbacks.len(),
            "Sheet loaded"
        );
        Ok(sheet)
    }
}
