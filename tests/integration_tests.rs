use async_trait::async_trait;
use clap::Parser;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;

use youtuber::catalog::{ListQuery, SearchField, SearchQuery, SortField, SortOrder};
use youtuber::cli::Cli;
use youtuber::core::{DownloadProgress, DownloadRequest, SubtitleTrack};
use youtuber::{
    App, AppPaths, Catalog, ConfigStore, DuplicatePolicy, Engine, Error, MediaInfo, NewEntry,
    Result,
};

/// One item the fake engine reports. `size: None` reports it without writing
/// the file.
#[derive(Clone)]
struct FakeItem {
    info: MediaInfo,
    size: Option<usize>,
}

struct FakeEngine {
    items: Vec<FakeItem>,
}

#[async_trait]
impl Engine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn probe(&self, _url: &Url, _cookies: Option<&Path>) -> Result<MediaInfo> {
        self.items
            .first()
            .map(|item| item.info.clone())
            .ok_or_else(|| Error::external("fake", "nothing to probe"))
    }

    async fn download(
        &self,
        _url: &Url,
        request: &DownloadRequest,
        progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Vec<MediaInfo>> {
        let mut finished = Vec::new();
        for item in &self.items {
            let path = request.output_dir.join(format!("{}.mp4", item.info.id));
            if let Some(size) = item.size {
                std::fs::write(&path, vec![0u8; size])?;
            }

            let mut info = item.info.clone();
            info.filepath = Some(path);
            if let Some(languages) = &request.transcripts {
                let mut tracks = HashMap::new();
                for lang in languages {
                    let sub = request
                        .output_dir
                        .join(format!("{}.{}.vtt", item.info.id, lang));
                    std::fs::write(&sub, "WEBVTT\n")?;
                    tracks.insert(
                        lang.clone(),
                        SubtitleTrack {
                            ext: Some("vtt".to_string()),
                            filepath: Some(sub),
                        },
                    );
                }
                info.requested_subtitles = Some(tracks);
            }
            progress(DownloadProgress {
                percent: 100.0,
                total: None,
            });
            finished.push(info);
        }
        Ok(finished)
    }
}

struct FailingEngine;

#[async_trait]
impl Engine for FailingEngine {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn probe(&self, _url: &Url, _cookies: Option<&Path>) -> Result<MediaInfo> {
        Err(Error::external("yt-dlp", "Video unavailable"))
    }

    async fn download(
        &self,
        _url: &Url,
        _request: &DownloadRequest,
        _progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Vec<MediaInfo>> {
        Err(Error::external("yt-dlp", "Video unavailable"))
    }
}

/// Remembers every request it is handed and downloads nothing.
#[derive(Clone, Default)]
struct RecordingEngine {
    requests: Arc<Mutex<Vec<DownloadRequest>>>,
}

#[async_trait]
impl Engine for RecordingEngine {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn probe(&self, _url: &Url, _cookies: Option<&Path>) -> Result<MediaInfo> {
        Err(Error::external("recording", "probe not supported"))
    }

    async fn download(
        &self,
        _url: &Url,
        request: &DownloadRequest,
        _progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Vec<MediaInfo>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Vec::new())
    }
}

fn media(id: &str, title: &str) -> MediaInfo {
    MediaInfo {
        id: id.to_string(),
        title: Some(title.to_string()),
        uploader: Some("Tester".to_string()),
        upload_date: Some("20240105".to_string()),
        duration: Some(61.0),
        ..MediaInfo::default()
    }
}

fn item(id: &str, title: &str, size: Option<usize>) -> FakeItem {
    FakeItem {
        info: media(id, title),
        size,
    }
}

fn open_app(root: &TempDir, engine: impl Engine + 'static) -> App {
    let paths = AppPaths::rooted(root.path());
    let config = ConfigStore::load(&paths.config_file()).unwrap();
    App::open(paths, config, Box::new(engine)).unwrap()
}

async fn run(app: &mut App, args: &[&str]) -> Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("youtuber").chain(args.iter().copied()))
        .expect("arguments parse");
    cli.run(app).await
}

fn download_dir(root: &TempDir) -> String {
    root.path().join("downloads").to_string_lossy().into_owned()
}

fn new_entry(id: &str, title: &str, size: u64) -> NewEntry {
    NewEntry {
        id: id.to_string(),
        title: Some(title.to_string()),
        filepath: format!("/videos/{}.mp4", id).into(),
        file_size: size,
        ..NewEntry::default()
    }
}

#[tokio::test]
async fn test_download_records_only_files_on_disk() {
    let root = tempfile::tempdir().unwrap();
    let engine = FakeEngine {
        items: vec![item("aaa", "On disk", Some(100)), item("bbb", "Vanished", None)],
    };
    let mut app = open_app(&root, engine);
    let out = download_dir(&root);

    run(&mut app, &["download", "https://example.com/watch?v=aaa", "-o", &out])
        .await
        .unwrap();

    let stats = app.catalog.stats().unwrap();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.total_size, 100);

    let stored = app.catalog.get("aaa").unwrap().unwrap();
    assert_eq!(stored.file_size, 100);
    assert_eq!(stored.duration, Some(61));
    assert!(stored.filepath.ends_with("aaa.mp4"));
    assert!(!app.catalog.contains("bbb").unwrap());
    app.close().unwrap();
}

#[tokio::test]
async fn test_redownload_does_not_grow_catalog() {
    let root = tempfile::tempdir().unwrap();
    let out = download_dir(&root);

    let mut app = open_app(&root, FakeEngine { items: vec![item("aaa", "First", Some(100))] });
    run(&mut app, &["download", "https://example.com/watch?v=aaa", "-o", &out])
        .await
        .unwrap();
    let first = app.catalog.get("aaa").unwrap().unwrap();
    app.close().unwrap();

    // Default policy is skip: the stored row stays as it was.
    let mut app = open_app(&root, FakeEngine { items: vec![item("aaa", "Second", Some(250))] });
    run(&mut app, &["download", "https://example.com/watch?v=aaa", "-o", &out])
        .await
        .unwrap();
    assert_eq!(app.catalog.stats().unwrap().entries, 1);
    assert_eq!(app.catalog.get("aaa").unwrap().unwrap(), first);

    run(&mut app, &["config", "set", "on_duplicate", "refresh"])
        .await
        .unwrap();
    run(&mut app, &["download", "https://example.com/watch?v=aaa", "-o", &out])
        .await
        .unwrap();
    let refreshed = app.catalog.get("aaa").unwrap().unwrap();
    assert_eq!(app.catalog.stats().unwrap().entries, 1);
    assert_eq!(refreshed.title.as_deref(), Some("Second"));
    assert_eq!(refreshed.file_size, 250);
    assert_eq!(refreshed.added_at, first.added_at);
    app.close().unwrap();
}

#[tokio::test]
async fn test_no_collection_leaves_catalog_empty() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FakeEngine { items: vec![item("aaa", "Clip", Some(10))] });
    let out = download_dir(&root);

    run(
        &mut app,
        &["download", "https://example.com/watch?v=aaa", "-o", &out, "--no-collection"],
    )
    .await
    .unwrap();

    assert!(root.path().join("downloads").join("aaa.mp4").exists());
    assert_eq!(app.catalog.stats().unwrap().entries, 0);
}

#[tokio::test]
async fn test_download_records_transcripts() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FakeEngine { items: vec![item("aaa", "Talk", Some(10))] });
    let out = download_dir(&root);

    run(
        &mut app,
        &["download", "https://example.com/watch?v=aaa", "-o", &out, "-l", "en,de"],
    )
    .await
    .unwrap();

    let transcripts = app.catalog.transcripts("aaa").unwrap();
    let languages: Vec<&str> = transcripts.iter().map(|t| t.language.as_str()).collect();
    assert_eq!(languages, vec!["de", "en"]);
    assert_eq!(app.catalog.stats().unwrap().transcripts, 2);
}

#[tokio::test]
async fn test_playlist_url_uses_playlist_layout() {
    let root = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::default();
    let mut app = open_app(&root, engine.clone());
    let out = download_dir(&root);

    run(
        &mut app,
        &["download", "https://www.youtube.com/playlist?list=PL123", "-o", &out],
    )
    .await
    .unwrap();
    run(
        &mut app,
        &["download", "https://www.youtube.com/watch?v=abc", "-o", &out, "--name", "clip"],
    )
    .await
    .unwrap();

    let requests = engine.requests.lock().unwrap();
    let playlist = &requests[0];
    assert!(playlist.playlist);
    assert!(playlist
        .output_template(playlist.playlist)
        .ends_with("%(playlist)s/%(playlist_index)s - %(title)s.%(ext)s"));

    let single = &requests[1];
    assert!(!single.playlist);
    assert!(single.output_template(single.playlist).ends_with("clip.%(ext)s"));
}

#[tokio::test]
async fn test_name_dropped_for_detected_playlist() {
    let root = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::default();
    let mut app = open_app(&root, engine.clone());
    let out = download_dir(&root);

    run(
        &mut app,
        &["download", "https://www.youtube.com/playlist?list=PL1", "-o", &out, "--name", "x"],
    )
    .await
    .unwrap();

    let requests = engine.requests.lock().unwrap();
    assert!(requests[0].playlist);
    assert_eq!(requests[0].file_name, None);
}

#[tokio::test]
async fn test_engine_failure_is_external_error() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FailingEngine);
    let out = download_dir(&root);

    let err = run(&mut app, &["download", "https://example.com/watch?v=aaa", "-o", &out])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ExternalTool { .. }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(app.catalog.stats().unwrap().entries, 0);
}

#[tokio::test]
async fn test_invalid_url_is_validation_error() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FailingEngine);

    let err = run(&mut app, &["download", "not a url"]).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_info_looks_up_stored_id() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FailingEngine);
    app.catalog
        .add(new_entry("abc123", "Stored", 5), DuplicatePolicy::Skip)
        .unwrap();

    // A stored id never reaches the engine.
    run(&mut app, &["info", "abc123"]).await.unwrap();

    let err = run(&mut app, &["info", "https://example.com/watch?v=zzz"])
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_config_set_and_reset() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FailingEngine);

    run(&mut app, &["config", "set", "default_quality", "720p"])
        .await
        .unwrap();
    run(&mut app, &["config", "set", "download_transcripts", "yes"])
        .await
        .unwrap();
    assert_eq!(app.config.get("default_quality").unwrap(), "720p");

    // Persisted immediately.
    let reloaded = ConfigStore::load(app.config.path()).unwrap();
    assert_eq!(reloaded.get("download_transcripts").unwrap(), "true");

    let err = run(&mut app, &["config", "reset"]).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(app.config.get("default_quality").unwrap(), "720p");

    run(&mut app, &["config", "reset", "--yes"]).await.unwrap();
    assert_eq!(app.config.get("default_quality").unwrap(), "best");
    assert_eq!(app.config.get("download_transcripts").unwrap(), "false");
}

#[tokio::test]
async fn test_unknown_config_key_rejected() {
    let root = tempfile::tempdir().unwrap();
    let mut app = open_app(&root, FailingEngine);

    let err = run(&mut app, &["config", "set", "colour", "blue"])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_distinct_ids_determine_count() {
    let mut catalog = Catalog::in_memory().unwrap();
    for id in ["a", "b", "a", "c", "b", "a"] {
        catalog
            .add(new_entry(id, id, 1), DuplicatePolicy::Skip)
            .unwrap();
    }
    assert_eq!(catalog.stats().unwrap().entries, 3);
    assert_eq!(catalog.list(&ListQuery::default()).unwrap().len(), 3);
}

#[test]
fn test_list_by_file_size_desc_is_non_increasing() {
    let mut catalog = Catalog::in_memory().unwrap();
    for (id, size) in [("a", 300), ("b", 50), ("c", 300), ("d", 1000), ("e", 0)] {
        catalog
            .add(new_entry(id, id, size), DuplicatePolicy::Skip)
            .unwrap();
    }

    let entries = catalog
        .list(&ListQuery::sorted(SortField::FileSize, SortOrder::Desc))
        .unwrap();
    let sizes: Vec<u64> = entries.iter().map(|e| e.file_size).collect();
    assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(entries[1].id, "a");
    assert_eq!(entries[2].id, "c");
}

#[test]
fn test_title_search_ignores_description_matches() {
    let mut catalog = Catalog::in_memory().unwrap();
    catalog
        .add(new_entry("t", "Rust in production", 1), DuplicatePolicy::Skip)
        .unwrap();
    let mut described = new_entry("d", "Cooking show", 1);
    described.description = Some("No rust here, only pans".to_string());
    catalog.add(described, DuplicatePolicy::Skip).unwrap();

    let by_title = catalog
        .search(&SearchQuery::new("RUST").field(SearchField::Title))
        .unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, "t");

    let anywhere = catalog.search(&SearchQuery::new("rust")).unwrap();
    assert_eq!(anywhere.len(), 2);
}

#[test]
fn test_stats_sum_sizes() {
    let mut catalog = Catalog::in_memory().unwrap();
    for (id, size) in [("a", 100), ("b", 200), ("c", 300)] {
        catalog
            .add(new_entry(id, id, size), DuplicatePolicy::Skip)
            .unwrap();
    }

    let stats = catalog.stats().unwrap();
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.total_size, 600);
    assert!(stats.last_added.is_some());
}
