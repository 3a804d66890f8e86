use async_trait::async_trait;
use std::path::Path;
use url::Url;

use crate::core::{DownloadRequest, MediaInfo};
use crate::error::{Error, Result};

/// One progress report from a running download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub percent: f32,
    /// Total size as the engine printed it, e.g. `12.34MiB`.
    pub total: Option<String>,
}

/// The external tool that locates and fetches media.
#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch metadata without downloading. `cookies` is handed to the
    /// engine untouched.
    async fn probe(&self, url: &Url, cookies: Option<&Path>) -> Result<MediaInfo>;

    /// Download `url`; returns one entry per item that finished, each with
    /// its final `filepath`.
    async fn download(
        &self,
        url: &Url,
        request: &DownloadRequest,
        progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Vec<MediaInfo>>;
}

/// Parse a user-supplied URL; only http(s) is accepted.
pub fn parse_media_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::validation(format!("invalid URL `{}`: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::validation(format!(
            "unsupported URL scheme `{}` in `{}`",
            other, raw
        ))),
    }
}

pub fn is_playlist_url(url: &Url) -> bool {
    let path = url.path();
    (path == "/playlist" && url.query_pairs().any(|(k, _)| k == "list"))
        || path.ends_with("/playlists")
}
