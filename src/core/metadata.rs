use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{normalize_upload_date, NewEntry};

/// Metadata the extraction engine reports for one media item. Mirrors the
/// subset of yt-dlp's info dict that the catalog and the `info` command use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Raw engine value, usually `YYYYMMDD`.
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    /// Final location on disk, present once the engine has moved the file.
    #[serde(default)]
    pub filepath: Option<PathBuf>,
    #[serde(default)]
    pub formats: Option<Vec<VideoFormat>>,
    #[serde(default)]
    pub requested_subtitles: Option<HashMap<String, SubtitleTrack>>,
    #[serde(default)]
    pub subtitles: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub automatic_captions: Option<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFormat {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub tbr: Option<f64>, // total bitrate
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub filepath: Option<PathBuf>,
}

/// A subtitle file written next to a download.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleFile {
    pub language: String,
    pub filepath: PathBuf,
    pub auto_generated: bool,
}

impl MediaInfo {
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
    }

    pub fn formats(&self) -> &[VideoFormat] {
        self.formats.as_deref().unwrap_or_default()
    }

    /// Catalog row for this item stored at `filepath` with `file_size` bytes.
    pub fn to_new_entry(&self, filepath: &Path, file_size: u64) -> NewEntry {
        NewEntry {
            id: self.id.clone(),
            title: non_empty(&self.title),
            uploader: non_empty(&self.uploader),
            description: non_empty(&self.description),
            upload_date: self.upload_date.as_deref().and_then(normalize_upload_date),
            duration: self.duration_secs(),
            filepath: filepath.to_path_buf(),
            file_size,
            url: non_empty(&self.webpage_url),
            resolution: non_empty(&self.resolution),
        }
    }

    /// Subtitle files the engine wrote, in language order. A language only
    /// present among the automatic captions is flagged as auto-generated.
    pub fn subtitle_files(&self) -> Vec<SubtitleFile> {
        let Some(requested) = &self.requested_subtitles else {
            return Vec::new();
        };

        let manual = |lang: &str| {
            self.subtitles
                .as_ref()
                .is_some_and(|subs| subs.contains_key(lang))
        };
        let automatic = |lang: &str| {
            self.automatic_captions
                .as_ref()
                .is_some_and(|caps| caps.contains_key(lang))
        };

        let mut files: Vec<SubtitleFile> = requested
            .iter()
            .filter_map(|(lang, track)| {
                track.filepath.as_ref().map(|path| SubtitleFile {
                    language: lang.clone(),
                    filepath: path.clone(),
                    auto_generated: automatic(lang) && !manual(lang),
                })
            })
            .collect();
        files.sort_by(|a, b| a.language.cmp(&b.language));
        files
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
