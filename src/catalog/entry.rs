use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A downloaded item, as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub description: Option<String>,
    pub upload_date: Option<NaiveDate>,
    pub duration: Option<u64>,
    pub filepath: PathBuf,
    pub file_size: u64,
    pub url: Option<String>,
    pub resolution: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Insert payload for [`crate::catalog::Catalog::add`]. The catalog assigns
/// `added_at` itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEntry {
    pub id: String,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub description: Option<String>,
    pub upload_date: Option<NaiveDate>,
    pub duration: Option<u64>,
    pub filepath: PathBuf,
    pub file_size: u64,
    pub url: Option<String>,
    pub resolution: Option<String>,
}

/// What to do when an entry with an existing id is added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the stored row untouched.
    #[default]
    Skip,
    /// Overwrite metadata, path and size; `added_at` is kept.
    Refresh,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Skip => f.write_str("skip"),
            DuplicatePolicy::Refresh => f.write_str("refresh"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(DuplicatePolicy::Skip),
            "refresh" => Ok(DuplicatePolicy::Refresh),
            other => Err(format!("expected `skip` or `refresh`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddOutcome {
    Inserted,
    Refreshed,
    Unchanged,
}

/// Result of an add: the row as it is now stored, and what happened to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Added {
    pub entry: CatalogEntry,
    pub outcome: AddOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub entry_id: String,
    pub language: String,
    pub filepath: PathBuf,
    pub auto_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub entries: u64,
    pub total_size: u64,
    pub last_added: Option<DateTime<Utc>>,
    pub transcripts: u64,
}

/// Normalizes an engine-reported upload date. Accepts `YYYYMMDD` and
/// `YYYY-MM-DD`; anything else is treated as unknown.
pub fn normalize_upload_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}
