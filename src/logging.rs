//! Console and file logging setup.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Console verbosity chosen from flags and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Install the global subscriber: stderr at the requested verbosity
/// (`RUST_LOG` overrides it) and, when the log directory is writable, a
/// plain-text file at debug level. Returns the log file in use.
pub fn init(verbosity: Verbosity, log_dir: &Path) -> Option<PathBuf> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .with_filter(console_filter);

    let (file_layer, log_file, open_error) = match open_log_file(log_dir) {
        Ok((file, path)) => {
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new("youtuber=debug"));
            (Some(layer), Some(path), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init();

    if let Some(e) = open_error {
        tracing::warn!("File logging disabled, could not open log in {}: {}", log_dir.display(), e);
    }
    log_file
}

fn open_log_file(log_dir: &Path) -> std::io::Result<(File, PathBuf)> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!(
        "youtuber_{}.log",
        chrono::Local::now().format("%Y%m%d")
    ));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}
