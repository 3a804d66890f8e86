use tracing::debug;

use crate::catalog::Catalog;
use crate::config::{AppPaths, ConfigStore};
use crate::core::{Downloader, Engine};
use crate::error::Result;

/// Everything a command needs, opened once per process.
pub struct App {
    pub paths: AppPaths,
    pub config: ConfigStore,
    pub catalog: Catalog,
    pub downloader: Downloader,
}

impl App {
    pub fn open(paths: AppPaths, config: ConfigStore, engine: Box<dyn Engine>) -> Result<Self> {
        let catalog = Catalog::open(&paths.catalog_file())?;
        let downloader = Downloader::new(engine);
        debug!("Using {} engine", downloader.engine_name());
        Ok(Self {
            paths,
            config,
            catalog,
            downloader,
        })
    }

    pub fn close(self) -> Result<()> {
        self.catalog.close()
    }
}
