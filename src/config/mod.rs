pub mod paths;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::catalog::DuplicatePolicy;
use crate::core::{Container, Quality};
use crate::error::{Error, Result};
use crate::utils::expand_path;

pub use paths::AppPaths;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub download_dir: PathBuf,
    pub default_quality: Quality,
    pub default_format: Container,
    pub download_transcripts: bool,
    pub transcript_languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies_file: Option<PathBuf>,
    pub embed_thumbnail: bool,
    pub embed_metadata: bool,
    pub write_description: bool,
    pub write_info_json: bool,
    pub on_duplicate: DuplicatePolicy,
    pub verbose: bool,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: paths::default_download_dir(),
            default_quality: Quality::Best,
            default_format: Container::Mp4,
            download_transcripts: false,
            transcript_languages: vec!["en".to_string()],
            cookies_file: None,
            embed_thumbnail: true,
            embed_metadata: true,
            write_description: false,
            write_info_json: false,
            on_duplicate: DuplicatePolicy::Skip,
            verbose: false,
            debug: false,
        }
    }
}

/// Every recognized configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigKey {
    CookiesFile,
    Debug,
    DefaultFormat,
    DefaultQuality,
    DownloadDir,
    DownloadTranscripts,
    EmbedMetadata,
    EmbedThumbnail,
    OnDuplicate,
    TranscriptLanguages,
    Verbose,
    WriteDescription,
    WriteInfoJson,
}

impl ConfigKey {
    /// Sorted by name.
    pub const ALL: [ConfigKey; 13] = [
        ConfigKey::CookiesFile,
        ConfigKey::Debug,
        ConfigKey::DefaultFormat,
        ConfigKey::DefaultQuality,
        ConfigKey::DownloadDir,
        ConfigKey::DownloadTranscripts,
        ConfigKey::EmbedMetadata,
        ConfigKey::EmbedThumbnail,
        ConfigKey::OnDuplicate,
        ConfigKey::TranscriptLanguages,
        ConfigKey::Verbose,
        ConfigKey::WriteDescription,
        ConfigKey::WriteInfoJson,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::CookiesFile => "cookies_file",
            ConfigKey::Debug => "debug",
            ConfigKey::DefaultFormat => "default_format",
            ConfigKey::DefaultQuality => "default_quality",
            ConfigKey::DownloadDir => "download_dir",
            ConfigKey::DownloadTranscripts => "download_transcripts",
            ConfigKey::EmbedMetadata => "embed_metadata",
            ConfigKey::EmbedThumbnail => "embed_thumbnail",
            ConfigKey::OnDuplicate => "on_duplicate",
            ConfigKey::TranscriptLanguages => "transcript_languages",
            ConfigKey::Verbose => "verbose",
            ConfigKey::WriteDescription => "write_description",
            ConfigKey::WriteInfoJson => "write_info_json",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                Error::validation(format!(
                    "unknown config key `{}` (known keys: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl Config {
    /// Current value of `key` rendered as text.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::CookiesFile => self
                .cookies_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::Debug => self.debug.to_string(),
            ConfigKey::DefaultFormat => self.default_format.to_string(),
            ConfigKey::DefaultQuality => self.default_quality.to_string(),
            ConfigKey::DownloadDir => self.download_dir.display().to_string(),
            ConfigKey::DownloadTranscripts => self.download_transcripts.to_string(),
            ConfigKey::EmbedMetadata => self.embed_metadata.to_string(),
            ConfigKey::EmbedThumbnail => self.embed_thumbnail.to_string(),
            ConfigKey::OnDuplicate => self.on_duplicate.to_string(),
            ConfigKey::TranscriptLanguages => self.transcript_languages.join(","),
            ConfigKey::Verbose => self.verbose.to_string(),
            ConfigKey::WriteDescription => self.write_description.to_string(),
            ConfigKey::WriteInfoJson => self.write_info_json.to_string(),
        }
    }

    /// Parse `value` for `key` and store it. Nothing changes on error.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let invalid = |msg: String| Error::validation(format!("{}: {}", key, msg));
        match key {
            ConfigKey::CookiesFile => {
                let value = value.trim();
                self.cookies_file = (!value.is_empty()).then(|| expand_path(value));
            }
            ConfigKey::Debug => self.debug = parse_bool(key, value)?,
            ConfigKey::DefaultFormat => self.default_format = value.parse().map_err(invalid)?,
            ConfigKey::DefaultQuality => self.default_quality = value.parse().map_err(invalid)?,
            ConfigKey::DownloadDir => {
                if value.trim().is_empty() {
                    return Err(invalid("path must not be empty".to_string()));
                }
                self.download_dir = expand_path(value);
            }
            ConfigKey::DownloadTranscripts => self.download_transcripts = parse_bool(key, value)?,
            ConfigKey::EmbedMetadata => self.embed_metadata = parse_bool(key, value)?,
            ConfigKey::EmbedThumbnail => self.embed_thumbnail = parse_bool(key, value)?,
            ConfigKey::OnDuplicate => self.on_duplicate = value.parse().map_err(invalid)?,
            ConfigKey::TranscriptLanguages => {
                let langs = parse_languages(value);
                if langs.is_empty() {
                    return Err(invalid("at least one language is required".to_string()));
                }
                self.transcript_languages = langs;
            }
            ConfigKey::Verbose => self.verbose = parse_bool(key, value)?,
            ConfigKey::WriteDescription => self.write_description = parse_bool(key, value)?,
            ConfigKey::WriteInfoJson => self.write_info_json = parse_bool(key, value)?,
        }
        Ok(())
    }

    /// All keys with their values, sorted by key.
    pub fn entries(&self) -> Vec<(ConfigKey, String)> {
        ConfigKey::ALL.into_iter().map(|k| (k, self.get(k))).collect()
    }
}

fn parse_bool(key: ConfigKey, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(Error::validation(format!(
            "{}: expected true/false, got `{}`",
            key, other
        ))),
    }
}

/// Comma- or space-separated language codes, deduplicated in order.
pub fn parse_languages(value: &str) -> Vec<String> {
    let mut langs: Vec<String> = Vec::new();
    for lang in value
        .split([',', ' '])
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        if !langs.iter().any(|l| l == lang) {
            langs.push(lang.to_string());
        }
    }
    langs
}

/// The persisted settings file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
    fallback: Option<String>,
}

impl ConfigStore {
    /// Load settings from `path`. A missing file is created with defaults;
    /// an unreadable one is left alone and defaults are used instead.
    pub fn load(path: &Path) -> Result<Self> {
        let (config, fallback) = match std::fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(config) => (config, None),
                Err(e) => {
                    let reason = format!("{} is not valid ({}), using defaults", path.display(), e);
                    warn!("{}", reason);
                    (Config::default(), Some(reason))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path: path.to_path_buf(),
                    config: Config::default(),
                    fallback: None,
                };
                store.save()?;
                debug!("Created default config at {}", path.display());
                return Ok(store);
            }
            Err(e) => {
                let reason = format!("could not read {} ({}), using defaults", path.display(), e);
                warn!("{}", reason);
                (Config::default(), Some(reason))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            config,
            fallback,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Why defaults were used instead of the file on disk, if they were.
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn get(&self, key: &str) -> Result<String> {
        Ok(self.config.get(key.parse()?))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key: ConfigKey = key.parse()?;
        let mut updated = self.config.clone();
        updated.set(key, value)?;
        self.config = updated;
        self.save()
    }

    pub fn list(&self) -> Vec<(ConfigKey, String)> {
        self.config.entries()
    }

    /// Discard every override and persist the defaults.
    pub fn reset(&mut self) -> Result<()> {
        self.config = Config::default();
        self.save()
    }

    fn save(&self) -> Result<()> {
        let config_err = |message: String| Error::Config {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| config_err(e.to_string()))?;
        }
        let text = toml::to_string_pretty(&self.config).map_err(|e| config_err(e.to_string()))?;

        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, text).map_err(|e| config_err(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| config_err(e.to_string()))?;
        Ok(())
    }
}
