use serde::Serialize;

use crate::catalog::{CatalogEntry, CatalogStats, TranscriptRecord};
use crate::config::{AppPaths, ConfigKey};
use crate::core::MediaInfo;
use crate::error::{Error, Result};
use crate::utils::{format_duration, human_size, truncate};

const TITLE_WIDTH: usize = 50;
const UPLOADER_WIDTH: usize = 24;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;
    println!("{}", text);
    Ok(())
}

/// A stored entry with its transcripts, as `info --json` prints it.
#[derive(Debug, Serialize)]
pub struct EntryDetail<'a> {
    #[serde(flatten)]
    pub entry: &'a CatalogEntry,
    pub transcripts: &'a [TranscriptRecord],
}

pub fn print_entries(heading: &str, entries: &[CatalogEntry]) {
    println!("{} ({} video{})", heading, entries.len(), plural(entries.len()));
    println!();
    println!(
        "{:<tw$}  {:<uw$}  {:>8}  {:>10}  {}",
        "Title",
        "Uploader",
        "Duration",
        "Size",
        "Added",
        tw = TITLE_WIDTH,
        uw = UPLOADER_WIDTH
    );
    for entry in entries {
        println!(
            "{:<tw$}  {:<uw$}  {:>8}  {:>10}  {}",
            truncate(entry.title.as_deref().unwrap_or(&entry.id), TITLE_WIDTH),
            truncate(entry.uploader.as_deref().unwrap_or("Unknown"), UPLOADER_WIDTH),
            entry
                .duration
                .map(format_duration)
                .unwrap_or_else(|| "N/A".to_string()),
            human_size(entry.file_size),
            entry.added_at.format("%Y-%m-%d"),
            tw = TITLE_WIDTH,
            uw = UPLOADER_WIDTH
        );
    }
}

pub fn print_entry(entry: &CatalogEntry, transcripts: &[TranscriptRecord]) {
    println!("ID:          {}", entry.id);
    println!("Title:       {}", entry.title.as_deref().unwrap_or("N/A"));
    println!("Uploader:    {}", entry.uploader.as_deref().unwrap_or("Unknown"));
    println!(
        "Uploaded:    {}",
        entry
            .upload_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    if let Some(duration) = entry.duration {
        println!("Duration:    {}", format_duration(duration));
    }
    if let Some(resolution) = &entry.resolution {
        println!("Resolution:  {}", resolution);
    }
    if let Some(url) = &entry.url {
        println!("URL:         {}", url);
    }
    println!("File:        {}", entry.filepath.display());
    println!("Size:        {}", human_size(entry.file_size));
    println!("Added:       {}", entry.added_at.format("%Y-%m-%d %H:%M:%S UTC"));
    for t in transcripts {
        println!(
            "Transcript:  {} {}{}",
            t.language,
            t.filepath.display(),
            if t.auto_generated { " (auto)" } else { "" }
        );
    }
    if let Some(description) = &entry.description {
        println!("\n{}", truncate(description, 200));
    }
}

pub fn print_media_info(info: &MediaInfo) {
    println!("Title:       {}", info.title.as_deref().unwrap_or("N/A"));
    println!("ID:          {}", info.id);
    println!("Uploader:    {}", info.uploader.as_deref().unwrap_or("N/A"));
    if let Some(duration) = info.duration_secs() {
        println!("Duration:    {}", format_duration(duration));
    }
    if let Some(views) = info.view_count {
        println!("Views:       {}", views);
    }
    if let Some(likes) = info.like_count {
        println!("Likes:       {}", likes);
    }
    println!("Upload date: {}", info.upload_date.as_deref().unwrap_or("N/A"));

    let formats = info.formats();
    if !formats.is_empty() {
        println!("Formats:     {}", formats.len());
        for (i, format) in formats.iter().rev().enumerate().take(5) {
            println!(
                "  {}: {} - {} ({})",
                i + 1,
                format.format_id,
                format.resolution.as_deref().unwrap_or("unknown"),
                format.ext.as_deref().unwrap_or("?")
            );
        }
    }
    if let Some(description) = &info.description {
        println!("\n{}", truncate(description, 200));
    }
}

pub fn print_stats(stats: &CatalogStats) {
    println!("Collection Statistics");
    println!("Total videos:      {}", stats.entries);
    println!("Total size:        {}", human_size(stats.total_size));
    println!("Total transcripts: {}", stats.transcripts);
    println!(
        "Last download:     {}",
        stats
            .last_added
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "Never".to_string())
    );
}

pub fn print_paths(paths: &AppPaths, download_dir: &std::path::Path) {
    println!("Application Paths");
    println!("Config directory:   {}", paths.config_dir.display());
    println!("Data directory:     {}", paths.data_dir.display());
    println!("Log directory:      {}", paths.log_dir.display());
    println!("Download directory: {}", download_dir.display());
    println!("Database:           {}", paths.catalog_file().display());
    println!("Config file:        {}", paths.config_file().display());
}

pub fn print_config(entries: &[(ConfigKey, String)]) {
    let width = entries
        .iter()
        .map(|(k, _)| k.as_str().len())
        .max()
        .unwrap_or(0);
    for (key, value) in entries {
        println!("{:<width$} = {}", key.as_str(), value, width = width);
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
