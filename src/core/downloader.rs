use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};
use url::Url;

use crate::catalog::{Added, Catalog, DuplicatePolicy, TranscriptRecord};
use crate::config::Config;
use crate::core::{is_playlist_url, parse_media_url, DownloadProgress, Engine, MediaInfo};
use crate::error::Result;
use crate::utils::{escape_template, sanitize_filename};

/// Requested video quality: `best`, `audio`, or a maximum height like `720p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Quality {
    #[default]
    Best,
    Audio,
    MaxHeight(u32),
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => f.write_str("best"),
            Quality::Audio => f.write_str("audio"),
            Quality::MaxHeight(h) => write!(f, "{}p", h),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "best" => Ok(Quality::Best),
            "audio" => Ok(Quality::Audio),
            other => other
                .strip_suffix('p')
                .and_then(|h| h.parse::<u32>().ok())
                .filter(|h| *h > 0)
                .map(Quality::MaxHeight)
                .ok_or_else(|| {
                    format!(
                        "invalid quality `{}` (expected best, audio, or a height like 720p)",
                        other
                    )
                }),
        }
    }
}

impl TryFrom<String> for Quality {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quality> for String {
    fn from(q: Quality) -> Self {
        q.to_string()
    }
}

/// Output container for merged video downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Mkv,
    Webm,
}

impl Container {
    pub fn ext(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Mkv => "mkv",
            Container::Webm => "webm",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

impl FromStr for Container {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Container::Mp4),
            "mkv" => Ok(Container::Mkv),
            "webm" => Ok(Container::Webm),
            other => Err(format!("invalid format `{}` (expected mp4, mkv or webm)", other)),
        }
    }
}

/// Everything the engine needs to know about one download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub output_dir: PathBuf,
    pub quality: Quality,
    pub container: Container,
    /// Custom base name; sanitized before use.
    pub file_name: Option<String>,
    pub playlist: bool,
    /// Subtitle languages to fetch; `None` skips transcripts.
    pub transcripts: Option<Vec<String>>,
    pub cookies_file: Option<PathBuf>,
    pub embed_thumbnail: bool,
    pub embed_metadata: bool,
    pub write_description: bool,
    pub write_info_json: bool,
}

impl DownloadRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.download_dir.clone(),
            quality: config.default_quality,
            container: config.default_format,
            file_name: None,
            playlist: false,
            transcripts: config
                .download_transcripts
                .then(|| config.transcript_languages.clone()),
            cookies_file: config.cookies_file.clone(),
            embed_thumbnail: config.embed_thumbnail,
            embed_metadata: config.embed_metadata,
            write_description: config.write_description,
            write_info_json: config.write_info_json,
        }
    }

    /// Output template handed to the engine, rooted at `output_dir`.
    /// `playlist` is the resolved flag, see [`DownloadRequest::is_playlist`].
    pub fn output_template(&self, playlist: bool) -> String {
        let name = if playlist {
            "%(playlist)s/%(playlist_index)s - %(title)s.%(ext)s".to_string()
        } else if let Some(name) = &self.file_name {
            format!("{}.%(ext)s", escape_template(&sanitize_filename(name)))
        } else {
            "%(title)s.%(ext)s".to_string()
        };
        self.output_dir.join(name).to_string_lossy().into_owned()
    }

    /// Whether `url` is fetched as a playlist: asked for, or a playlist URL.
    pub fn is_playlist(&self, url: &Url) -> bool {
        self.playlist || is_playlist_url(url)
    }
}

/// yt-dlp format selector for `quality`. Without ffmpeg nothing can be
/// merged, so only single-file formats are asked for.
pub fn format_selector(quality: Quality, ffmpeg: bool) -> String {
    match (quality, ffmpeg) {
        (Quality::Audio, _) => "bestaudio/best".to_string(),
        (Quality::Best, true) => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
        (Quality::Best, false) => "best[ext=mp4][protocol^=http]/best[ext=mp4]/best".to_string(),
        (Quality::MaxHeight(h), true) => format!(
            "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/best[height<={h}]/best",
            h = h
        ),
        (Quality::MaxHeight(h), false) => format!(
            "best[height<={h}][ext=mp4][protocol^=http]/best[height<={h}][ext=mp4]/best[height<={h}]/best",
            h = h
        ),
    }
}

pub struct Downloader {
    engine: Box<dyn Engine>,
}

impl Downloader {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub async fn probe(&self, url: &str, cookies: Option<&Path>) -> Result<MediaInfo> {
        let url = parse_media_url(url)?;
        self.engine.probe(&url, cookies).await
    }

    /// Download `url` and return one [`MediaInfo`] per finished item.
    pub async fn download(
        &self,
        url: &str,
        request: &DownloadRequest,
        progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Vec<MediaInfo>> {
        let url = parse_media_url(url)?;
        let mut request = request.clone();
        request.playlist = request.is_playlist(&url);
        if request.playlist && request.file_name.take().is_some() {
            warn!("Custom file name ignored for playlist downloads");
        }
        std::fs::create_dir_all(&request.output_dir)?;

        info!(url = %url, engine = self.engine.name(), "Starting download");
        debug!(?request, "download request");

        let items = self.engine.download(&url, &request, progress).await?;
        info!("Engine reported {} finished item(s)", items.len());
        Ok(items)
    }
}

/// What happened when a finished download was handed to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Added {
        added: Added,
        transcripts: usize,
    },
    /// The engine reported success but nothing is on disk; nothing stored.
    MissingFile(Option<PathBuf>),
}

/// Store a finished download in the catalog. Only files that actually
/// exist are recorded, with their size measured from disk.
pub fn record_download(
    catalog: &mut Catalog,
    media: &MediaInfo,
    policy: DuplicatePolicy,
) -> Result<Recorded> {
    let Some(path) = media.filepath.as_deref() else {
        warn!(id = %media.id, "Engine did not report a file path, not adding to collection");
        return Ok(Recorded::MissingFile(None));
    };

    let size = match file_size(path) {
        Some(size) => size,
        None => {
            warn!(
                id = %media.id,
                "Downloaded file {} is missing, not adding to collection",
                path.display()
            );
            return Ok(Recorded::MissingFile(Some(path.to_path_buf())));
        }
    };

    let added = catalog.add(media.to_new_entry(path, size), policy)?;

    let mut transcripts = 0;
    for sub in media.subtitle_files() {
        if file_size(&sub.filepath).is_none() {
            warn!("Transcript {} is missing, skipping", sub.filepath.display());
            continue;
        }
        catalog.add_transcript(&TranscriptRecord {
            entry_id: added.entry.id.clone(),
            language: sub.language,
            filepath: sub.filepath,
            auto_generated: sub.auto_generated,
        })?;
        transcripts += 1;
    }

    Ok(Recorded::Added { added, transcripts })
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}
