//! Per-OS standard locations for config, catalog, logs and downloads.

use directories::{ProjectDirs, UserDirs};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const APP_NAME: &str = "youtuber";

/// When set, every location is placed under this directory instead of the
/// platform defaults.
pub const HOME_ENV: &str = "YOUTUBER_HOME";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub download_dir: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::rooted(root));
        }

        let dirs = ProjectDirs::from("", "YouTuber", APP_NAME).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine a home directory for application data",
            ))
        })?;
        let data_dir = dirs.data_dir().to_path_buf();

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            log_dir: data_dir.join("logs"),
            data_dir,
            download_dir: default_download_dir(),
        })
    }

    /// Everything under one directory; used by `YOUTUBER_HOME` and tests.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            log_dir: root.join("data").join("logs"),
            download_dir: root.join("downloads"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir.join("collection.db")
    }
}

/// The user's videos directory plus `YouTuber`, falling back to the home
/// directory when the platform has no videos directory.
pub fn default_download_dir() -> PathBuf {
    if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(root).join("downloads");
    }

    let user_dirs = UserDirs::new();
    user_dirs
        .as_ref()
        .and_then(|u| u.video_dir().map(|v| v.join("YouTuber")))
        .or_else(|| user_dirs.as_ref().map(|u| u.home_dir().join("YouTuber")))
        .unwrap_or_else(|| PathBuf::from("YouTuber"))
}
