use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use youtuber::cli::Cli;
use youtuber::logging::{self, Verbosity};
use youtuber::{App, AppPaths, ConfigStore, YtDlp};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let show_chain = cli.debug;

    if let Err(error) = run(cli).await {
        eprintln!("Error: {:#}", error);
        if show_chain {
            eprintln!("{:?}", error);
        }
        std::process::exit(exit_code(&error));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    let config = ConfigStore::load(&paths.config_file())?;

    let settings = config.config();
    let verbosity = Verbosity::from_flags(
        cli.verbose || settings.verbose,
        cli.debug || settings.debug,
    );
    let log_file = logging::init(verbosity, &paths.log_dir);

    info!("Starting youtuber v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = log_file {
        debug!("Logging to {}", path.display());
    }
    // Loading happened before logging was up, so repeat the warning.
    if let Some(reason) = config.fallback_reason() {
        warn!("{}", reason);
    }

    let mut app = App::open(paths, config, Box::new(YtDlp::new()))
        .context("failed to open the collection")?;
    let result = cli.run(&mut app).await;
    let closed = app.close().context("failed to close the collection");

    result?;
    closed
}

/// Exit status for the first library error in the chain; 1 otherwise.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|e| e.downcast_ref::<youtuber::Error>())
        .map(youtuber::Error::exit_code)
        .unwrap_or(1)
}
