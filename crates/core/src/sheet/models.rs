use chrono::{DateTime, Utc};

/// One accepted spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Display name shown when the passcode matches.
    pub name: String,
    /// `-`-joined lookup key, compared byte for byte.
    pub passcode: String,
    /// Shared-file link of the video for this record.
    pub video_link: String,
    /// Fallback columns; the third defaults to the second when blank.
    pub fallback_links: [String; 3],
}

/// Parsed contents of the passcode sheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Accepted records in sheet order.
    pub records: Vec<Record>,
    /// Non-empty fallback links taken from the first record.
    pub fallbacks: Vec<String>,
    /// When the sheet was parsed.
    pub loaded_at: DateTime<Utc>,
}

impl Sheet {
    /// Build a sheet from records, deriving the fallback pool from the first one.
    pub fn from_records(records: Vec<Record>) -> Self {
        let fallbacks = records
            .first()
            .map(|first| {
                first
                    .fallback_links
                    .iter()
                    .filter(|link| !link.is_empty())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            records,
            fallbacks,
            loaded_at: Utc::now(),
        }
    }

    /// Sheet with no records and no fallbacks.
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// True when no row was accepted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
