pub mod downloader;
pub mod extractor;
pub mod metadata;

pub use downloader::{
    format_selector, record_download, Container, DownloadRequest, Downloader, Quality, Recorded,
};
pub use extractor::{is_playlist_url, parse_media_url, DownloadProgress, Engine};
pub use metadata::{MediaInfo, SubtitleFile, SubtitleTrack, VideoFormat};
