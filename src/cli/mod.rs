pub mod output;

use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::app::App;
use crate::catalog::{AddOutcome, ListQuery, SearchField, SearchQuery, SortField, SortOrder};
use crate::config::{parse_languages, Config};
use crate::core::{
    parse_media_url, record_download, Container, DownloadProgress, DownloadRequest, Quality,
    Recorded,
};
use crate::error::{Error, Result};
use crate::utils::expand_path;

#[derive(Parser, Debug)]
#[command(name = "youtuber")]
#[command(about = "Download videos with yt-dlp and keep a searchable local collection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output, including full error chains
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a video or playlist and add it to the collection
    Download(DownloadArgs),
    /// List the collection
    List(ListArgs),
    /// Search the collection
    Search(SearchArgs),
    /// Show metadata for a URL without downloading, or a stored entry by id
    Info(InfoArgs),
    /// Show collection statistics
    Stats,
    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Show where settings, the collection and logs are kept
    Paths,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// URL to download
    #[arg(value_name = "URL")]
    pub url: String,

    /// Video quality: best, audio, or a maximum height such as 720p
    #[arg(short, long)]
    pub quality: Option<Quality>,

    /// Container for merged video
    #[arg(short, long, value_enum)]
    pub format: Option<Container>,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Also download transcripts (subtitles)
    #[arg(short, long)]
    pub transcripts: bool,

    /// Transcript language; repeat or separate with commas. Implies --transcripts
    #[arg(short, long = "lang", value_name = "LANG")]
    pub languages: Vec<String>,

    /// Download the whole playlist
    #[arg(short, long)]
    pub playlist: bool,

    /// Custom file name, without extension
    #[arg(long, conflicts_with = "playlist")]
    pub name: Option<String>,

    /// Cookie file handed to yt-dlp
    #[arg(short, long)]
    pub cookies: Option<String>,

    /// Do not add the download to the collection
    #[arg(long)]
    pub no_collection: bool,
}

impl DownloadArgs {
    /// The configured defaults with this command's options applied on top.
    pub fn request(&self, config: &Config) -> DownloadRequest {
        let mut request = DownloadRequest::from_config(config);
        if let Some(quality) = self.quality {
            request.quality = quality;
        }
        if let Some(container) = self.format {
            request.container = container;
        }
        if let Some(dir) = &self.output_dir {
            request.output_dir = expand_path(dir);
        }

        let languages: Vec<String> = self
            .languages
            .iter()
            .flat_map(|l| parse_languages(l))
            .collect();
        if !languages.is_empty() {
            request.transcripts = Some(languages);
        } else if self.transcripts && request.transcripts.is_none() {
            request.transcripts = Some(config.transcript_languages.clone());
        }

        request.playlist = self.playlist;
        request.file_name = self.name.clone();
        if let Some(cookies) = &self.cookies {
            request.cookies_file = Some(expand_path(cookies));
        }
        request
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Field to sort by
    #[arg(short, long, value_enum, default_value_t = SortField::Date)]
    pub sort: SortField,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Maximum number of entries to show
    #[arg(short = 'n', long)]
    pub limit: Option<u64>,

    /// Number of entries to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Print JSON instead of a table
    #[arg(short, long)]
    pub json: bool,
}

impl ListArgs {
    fn query(&self) -> ListQuery {
        ListQuery {
            sort: self.sort,
            order: self.order,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Field to search in
    #[arg(short, long, value_enum, default_value_t = SearchField::All)]
    pub field: SearchField,

    /// Field to sort by
    #[arg(short, long, value_enum, default_value_t = SortField::Date)]
    pub sort: SortField,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<u64>,

    /// Print JSON instead of a table
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Video URL, or the id of an entry in the collection
    #[arg(value_name = "URL|ID")]
    pub target: String,

    /// Print JSON instead of a summary
    #[arg(short, long)]
    pub json: bool,

    /// Cookie file handed to yt-dlp
    #[arg(short, long)]
    pub cookies: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show every setting
    List,
    /// Show one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Restore every setting to its default
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self, app: &mut App) -> Result<()> {
        match self.command {
            Command::Download(args) => download(app, &args).await,
            Command::List(args) => list(app, &args),
            Command::Search(args) => search(app, &args),
            Command::Info(args) => show_info(app, &args).await,
            Command::Stats => {
                output::print_stats(&app.catalog.stats()?);
                Ok(())
            }
            Command::Config(command) => configure(app, command),
            Command::Paths => {
                output::print_paths(&app.paths, &app.config.config().download_dir);
                Ok(())
            }
        }
    }
}

async fn download(app: &mut App, args: &DownloadArgs) -> Result<()> {
    let request = args.request(app.config.config());
    let policy = app.config.config().on_duplicate;

    println!("Downloading: {}", args.url);
    println!("Output directory: {}", request.output_dir.display());

    let progress = |p: DownloadProgress| {
        print!("\rProgress: {:5.1}%", p.percent);
        let _ = std::io::stdout().flush();
    };
    let items = app.downloader.download(&args.url, &request, &progress).await?;
    println!();

    if items.is_empty() {
        println!("Nothing was downloaded.");
        return Ok(());
    }

    for media in &items {
        let title = media.title.as_deref().unwrap_or(&media.id);
        if args.no_collection {
            println!("Downloaded: {}", title);
            continue;
        }

        match record_download(&mut app.catalog, media, policy)? {
            Recorded::Added { added, transcripts } => {
                match added.outcome {
                    AddOutcome::Inserted => println!("Added to collection: {}", title),
                    AddOutcome::Refreshed => println!("Updated in collection: {}", title),
                    AddOutcome::Unchanged => println!("Already in collection: {}", title),
                }
                if transcripts > 0 {
                    println!("  {} transcript(s) saved", transcripts);
                }
            }
            Recorded::MissingFile(path) => {
                let path = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "unknown path".to_string());
                println!("Downloaded file not found ({}), not added: {}", path, title);
            }
        }
    }

    info!("Download command finished with {} item(s)", items.len());
    Ok(())
}

fn list(app: &App, args: &ListArgs) -> Result<()> {
    let entries = app.catalog.list(&args.query())?;
    if args.json {
        return output::print_json(&entries);
    }
    if entries.is_empty() {
        println!("Your collection is empty.");
        return Ok(());
    }
    output::print_entries("Collection", &entries);
    Ok(())
}

fn search(app: &App, args: &SearchArgs) -> Result<()> {
    let query = SearchQuery::new(args.query.as_str())
        .field(args.field)
        .order_by(ListQuery {
            sort: args.sort,
            order: args.order,
            limit: args.limit,
            offset: 0,
        });
    let entries = app.catalog.search(&query)?;
    if args.json {
        return output::print_json(&entries);
    }
    if entries.is_empty() {
        println!("No videos match `{}`.", args.query);
        return Ok(());
    }
    output::print_entries(&format!("Results for `{}`", args.query), &entries);
    Ok(())
}

async fn show_info(app: &App, args: &InfoArgs) -> Result<()> {
    // Anything that is not a URL is looked up in the collection.
    if parse_media_url(&args.target).is_err() {
        if let Some(entry) = app.catalog.get(&args.target)? {
            let transcripts = app.catalog.transcripts(&entry.id)?;
            if args.json {
                return output::print_json(&output::EntryDetail {
                    entry: &entry,
                    transcripts: &transcripts,
                });
            }
            output::print_entry(&entry, &transcripts);
            return Ok(());
        }
        debug!("`{}` is not a stored id, treating it as a URL", args.target);
    }

    let cookies: Option<PathBuf> = args
        .cookies
        .as_deref()
        .map(expand_path)
        .or_else(|| app.config.config().cookies_file.clone());

    println!("Extracting video information...");
    let info = app
        .downloader
        .probe(&args.target, cookies.as_deref())
        .await?;
    if args.json {
        return output::print_json(&info);
    }
    output::print_media_info(&info);
    Ok(())
}

fn configure(app: &mut App, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::List => {
            println!("Settings ({})", app.config.path().display());
            output::print_config(&app.config.list());
        }
        ConfigCommand::Get { key } => println!("{}", app.config.get(&key)?),
        ConfigCommand::Set { key, value } => {
            app.config.set(&key, &value)?;
            println!("{} = {}", key, app.config.get(&key)?);
        }
        ConfigCommand::Reset { yes } => {
            if !yes {
                return Err(Error::validation(
                    "refusing to reset settings without --yes",
                ));
            }
            app.config.reset()?;
            println!("Settings restored to defaults.");
        }
    }
    Ok(())
}
