pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod utils;

pub use app::App;
pub use catalog::{Catalog, CatalogEntry, CatalogStats, DuplicatePolicy, NewEntry};
pub use config::{AppPaths, Config, ConfigStore};
pub use core::{Downloader, Engine, MediaInfo};
pub use error::{Error, Result};
pub use extractors::YtDlp;
