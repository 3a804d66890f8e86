//! SQLite-backed collection catalog.
//!
//! One row per downloaded item, keyed by the upstream video id. Every public
//! operation runs in its own transaction and reports failures as
//! [`Error::Storage`] naming the operation.

pub mod entry;
pub mod query;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result, StorageContext};

pub use entry::{
    normalize_upload_date, AddOutcome, Added, CatalogEntry, CatalogStats, DuplicatePolicy,
    NewEntry, TranscriptRecord,
};
pub use query::{ListQuery, SearchField, SearchQuery, SortField, SortOrder};

const SCHEMA_VERSION: i64 = 1;

const ENTRY_COLUMNS: &str = "id, title, uploader, description, upload_date, duration, \
                             filepath, file_size, url, resolution, added_at";

pub struct Catalog {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Catalog {
    /// Open (or create) the catalog database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).during("open")?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .during("open")?;

        let catalog = Self::init(conn, Some(path.to_path_buf()))?;
        info!("Catalog opened at {}", path.display());
        Ok(catalog)
    }

    /// Open a throwaway in-memory catalog.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().during("open")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;").during("open")?;
        conn.busy_timeout(Duration::from_secs(5)).during("open")?;

        // Unicode-aware lowercase; SQLite's own lower() only folds ASCII.
        conn.create_scalar_function(
            "fold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text = ctx.get::<Option<String>>(0)?;
                Ok(text.map(|t| t.to_lowercase()))
            },
        )
        .during("open")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT,
                uploader TEXT,
                description TEXT,
                upload_date TEXT,
                duration INTEGER,
                filepath TEXT NOT NULL,
                file_size INTEGER NOT NULL DEFAULT 0,
                url TEXT,
                resolution TEXT,
                added_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_added_at ON entries(added_at);

            CREATE TABLE IF NOT EXISTS transcripts (
                entry_id TEXT NOT NULL,
                language TEXT NOT NULL,
                filepath TEXT NOT NULL,
                auto_generated INTEGER NOT NULL DEFAULT 0,
                added_at TEXT NOT NULL,
                PRIMARY KEY (entry_id, language),
                FOREIGN KEY (entry_id) REFERENCES entries(id)
            );
            "#,
        )
        .during("open")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .during("open")?;

        Ok(Self { conn, path })
    }

    /// Location of the database file, `None` for in-memory catalogs.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Add a downloaded item. A second add with the same id either leaves the
    /// stored row alone or refreshes it, depending on `policy`; it never
    /// creates a second row.
    pub fn add(&mut self, entry: NewEntry, policy: DuplicatePolicy) -> Result<Added> {
        self.add_at(entry, policy, Utc::now())
    }

    pub(crate) fn add_at(
        &mut self,
        entry: NewEntry,
        policy: DuplicatePolicy,
        now: DateTime<Utc>,
    ) -> Result<Added> {
        if entry.id.trim().is_empty() {
            return Err(Error::validation("catalog entry id must not be empty"));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .during("add")?;

        let exists = select_entry(&tx, &entry.id).during("add")?.is_some();
        let outcome = match (exists, policy) {
            (false, _) => {
                tx.execute(
                    "INSERT INTO entries (id, title, uploader, description, upload_date, duration,
                                          filepath, file_size, url, resolution, added_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        entry.id,
                        entry.title,
                        entry.uploader,
                        entry.description,
                        entry.upload_date,
                        entry.duration.map(to_sql_int),
                        path_text(&entry.filepath),
                        to_sql_int(entry.file_size),
                        entry.url,
                        entry.resolution,
                        timestamp_text(now),
                    ],
                )
                .during("add")?;
                AddOutcome::Inserted
            }
            (true, DuplicatePolicy::Skip) => AddOutcome::Unchanged,
            (true, DuplicatePolicy::Refresh) => {
                tx.execute(
                    "UPDATE entries
                     SET title = ?2, uploader = ?3, description = ?4, upload_date = ?5,
                         duration = ?6, filepath = ?7, file_size = ?8, url = ?9, resolution = ?10
                     WHERE id = ?1",
                    params![
                        entry.id,
                        entry.title,
                        entry.uploader,
                        entry.description,
                        entry.upload_date,
                        entry.duration.map(to_sql_int),
                        path_text(&entry.filepath),
                        to_sql_int(entry.file_size),
                        entry.url,
                        entry.resolution,
                    ],
                )
                .during("add")?;
                AddOutcome::Refreshed
            }
        };

        let stored = select_entry(&tx, &entry.id)
            .during("add")?
            .ok_or(Error::Storage {
                op: "add",
                source: rusqlite::Error::QueryReturnedNoRows,
            })?;
        tx.commit().during("add")?;

        debug!(id = %stored.id, ?outcome, "catalog add");
        Ok(Added {
            entry: stored,
            outcome,
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<CatalogEntry>> {
        select_entry(&self.conn, id).during("get")
    }

    pub fn contains(&self, id: &str) -> Result<bool> {
        self.conn
            .query_row("SELECT 1 FROM entries WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .during("get")
    }

    pub fn list(&self, query: &ListQuery) -> Result<Vec<CatalogEntry>> {
        let sql = format!(
            "SELECT {} FROM entries {}",
            ENTRY_COLUMNS,
            query.tail_sql(1)
        );
        let mut stmt = self.conn.prepare(&sql).during("list")?;
        let rows = stmt
            .query_map(params![query.limit_value(), query.offset_value()], entry_from_row)
            .during("list")?;
        rows.collect::<rusqlite::Result<Vec<_>>>().during("list")
    }

    /// Case-insensitive substring search. The needle is matched literally.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogEntry>> {
        let needle = query.text.trim();
        if needle.is_empty() {
            return Err(Error::validation("search query must not be empty"));
        }

        let sql = format!(
            "SELECT {} FROM entries WHERE {} {}",
            ENTRY_COLUMNS,
            query.field.predicate(),
            query.order_by.tail_sql(2)
        );
        let mut stmt = self.conn.prepare(&sql).during("search")?;
        let rows = stmt
            .query_map(
                params![
                    needle.to_lowercase(),
                    query.order_by.limit_value(),
                    query.order_by.offset_value()
                ],
                entry_from_row,
            )
            .during("search")?;
        rows.collect::<rusqlite::Result<Vec<_>>>().during("search")
    }

    /// Aggregates over the whole catalog, computed on every call.
    pub fn stats(&mut self) -> Result<CatalogStats> {
        let tx = self.conn.transaction().during("stats")?;

        let (entries, total_size, last_added) = tx
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(file_size), 0), MAX(added_at) FROM entries",
                [],
                |row| {
                    let last: Option<String> = row.get(2)?;
                    let last = last.map(|s| parse_timestamp(&s, 2)).transpose()?;
                    Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, last))
                },
            )
            .during("stats")?;
        let transcripts: i64 = tx
            .query_row("SELECT COUNT(*) FROM transcripts", [], |row| row.get(0))
            .during("stats")?;
        tx.commit().during("stats")?;

        Ok(CatalogStats {
            entries: from_sql_int(entries),
            total_size: from_sql_int(total_size),
            last_added,
            transcripts: from_sql_int(transcripts),
        })
    }

    /// Record a transcript file for an existing entry. A second transcript in
    /// the same language replaces the stored path.
    pub fn add_transcript(&mut self, record: &TranscriptRecord) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .during("add_transcript")?;
        tx.execute(
            "INSERT INTO transcripts (entry_id, language, filepath, auto_generated, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(entry_id, language)
             DO UPDATE SET filepath = excluded.filepath, auto_generated = excluded.auto_generated",
            params![
                record.entry_id,
                record.language,
                path_text(&record.filepath),
                record.auto_generated,
                timestamp_text(Utc::now()),
            ],
        )
        .during("add_transcript")?;
        tx.commit().during("add_transcript")
    }

    pub fn transcripts(&self, entry_id: &str) -> Result<Vec<TranscriptRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT entry_id, language, filepath, auto_generated
                 FROM transcripts WHERE entry_id = ?1 ORDER BY language",
            )
            .during("transcripts")?;
        let rows = stmt
            .query_map([entry_id], |row| {
                Ok(TranscriptRecord {
                    entry_id: row.get(0)?,
                    language: row.get(1)?,
                    filepath: PathBuf::from(row.get::<_, String>(2)?),
                    auto_generated: row.get(3)?,
                })
            })
            .during("transcripts")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .during("transcripts")
    }

    /// Close the underlying connection, reporting any error SQLite raises.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, source)| Error::Storage { op: "close", source })
    }
}

fn select_entry(conn: &Connection, id: &str) -> rusqlite::Result<Option<CatalogEntry>> {
    conn.query_row(
        &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
        [id],
        entry_from_row,
    )
    .optional()
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let added_at: String = row.get(10)?;
    Ok(CatalogEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        uploader: row.get(2)?,
        description: row.get(3)?,
        upload_date: row.get(4)?,
        duration: row.get::<_, Option<i64>>(5)?.map(from_sql_int),
        filepath: PathBuf::from(row.get::<_, String>(6)?),
        file_size: from_sql_int(row.get(7)?),
        url: row.get(8)?,
        resolution: row.get(9)?,
        added_at: parse_timestamp(&added_at, 10)?,
    })
}

// Fixed-width RFC 3339 keeps lexical order equal to chronological order.
fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(text: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn entry(id: &str, title: &str, size: u64) -> NewEntry {
        NewEntry {
            id: id.to_string(),
            title: Some(title.to_string()),
            filepath: PathBuf::from(format!("/videos/{}.mp4", id)),
            file_size: size,
            ..NewEntry::default()
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn ids(entries: &[CatalogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_add_then_get() {
        let mut catalog = Catalog::in_memory().unwrap();
        let mut new = entry("abc", "First", 42);
        new.upload_date = NaiveDate::from_ymd_opt(2023, 5, 1);
        new.duration = Some(90);

        let added = catalog.add(new, DuplicatePolicy::Skip).unwrap();
        assert_eq!(added.outcome, AddOutcome::Inserted);
        assert_eq!(added.entry.title.as_deref(), Some("First"));

        let stored = catalog.get("abc").unwrap().unwrap();
        assert_eq!(stored, added.entry);
        assert_eq!(stored.upload_date, NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(stored.duration, Some(90));
        assert!(catalog.contains("abc").unwrap());
        assert!(!catalog.contains("zzz").unwrap());
        assert!(catalog.get("zzz").unwrap().is_none());
    }

    #[test]
    fn test_reinsert_skip_keeps_original() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog
            .add_at(entry("abc", "First", 10), DuplicatePolicy::Skip, at(0))
            .unwrap();
        let again = catalog
            .add_at(entry("abc", "Second", 20), DuplicatePolicy::Skip, at(5))
            .unwrap();

        assert_eq!(again.outcome, AddOutcome::Unchanged);
        assert_eq!(again.entry.title.as_deref(), Some("First"));
        assert_eq!(again.entry.file_size, 10);
        assert_eq!(catalog.list(&ListQuery::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_reinsert_refresh_preserves_added_at() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog
            .add_at(entry("abc", "First", 10), DuplicatePolicy::Refresh, at(0))
            .unwrap();
        let again = catalog
            .add_at(entry("abc", "Second", 20), DuplicatePolicy::Refresh, at(5))
            .unwrap();

        assert_eq!(again.outcome, AddOutcome::Refreshed);
        assert_eq!(again.entry.title.as_deref(), Some("Second"));
        assert_eq!(again.entry.file_size, 20);
        assert_eq!(again.entry.added_at, at(0));
        assert_eq!(catalog.stats().unwrap().entries, 1);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut catalog = Catalog::in_memory().unwrap();
        let err = catalog
            .add(entry("  ", "x", 1), DuplicatePolicy::Skip)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_list_by_date_with_id_tiebreak() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add_at(entry("b", "B", 1), DuplicatePolicy::Skip, at(10)).unwrap();
        catalog.add_at(entry("a", "A", 1), DuplicatePolicy::Skip, at(10)).unwrap();
        catalog.add_at(entry("c", "C", 1), DuplicatePolicy::Skip, at(0)).unwrap();

        let desc = catalog.list(&ListQuery::default()).unwrap();
        assert_eq!(ids(&desc), vec!["a", "b", "c"]);

        let asc = catalog
            .list(&ListQuery::sorted(SortField::Date, SortOrder::Asc))
            .unwrap();
        assert_eq!(ids(&asc), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_list_by_title_ignores_case() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add(entry("1", "banana", 1), DuplicatePolicy::Skip).unwrap();
        catalog.add(entry("2", "Apple", 1), DuplicatePolicy::Skip).unwrap();
        catalog.add(entry("3", "cherry", 1), DuplicatePolicy::Skip).unwrap();

        let asc = catalog
            .list(&ListQuery::sorted(SortField::Title, SortOrder::Asc))
            .unwrap();
        assert_eq!(ids(&asc), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_list_by_title_folds_unicode_case() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add(entry("1", "Éb", 1), DuplicatePolicy::Skip).unwrap();
        catalog.add(entry("2", "éa", 1), DuplicatePolicy::Skip).unwrap();
        catalog.add(entry("3", "ÉA", 1), DuplicatePolicy::Skip).unwrap();

        let asc = catalog
            .list(&ListQuery::sorted(SortField::Title, SortOrder::Asc))
            .unwrap();
        assert_eq!(ids(&asc), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_list_limit_and_offset() {
        let mut catalog = Catalog::in_memory().unwrap();
        for (i, size) in [500u64, 100, 400, 200, 300].iter().enumerate() {
            catalog
                .add(entry(&format!("v{}", i), "t", *size), DuplicatePolicy::Skip)
                .unwrap();
        }

        let query = ListQuery::sorted(SortField::FileSize, SortOrder::Asc).limit(2);
        let sizes: Vec<u64> = catalog
            .list(&query)
            .unwrap()
            .iter()
            .map(|e| e.file_size)
            .collect();
        assert_eq!(sizes, vec![100, 200]);

        let sizes: Vec<u64> = catalog
            .list(&query.offset(2))
            .unwrap()
            .iter()
            .map(|e| e.file_size)
            .collect();
        assert_eq!(sizes, vec![300, 400]);
    }

    #[test]
    fn test_list_by_upload_date() {
        let mut catalog = Catalog::in_memory().unwrap();
        for (id, date) in [("x", "20200101"), ("y", "20221231"), ("z", "20210615")] {
            let mut e = entry(id, id, 1);
            e.upload_date = normalize_upload_date(date);
            catalog.add(e, DuplicatePolicy::Skip).unwrap();
        }

        let desc = catalog
            .list(&ListQuery::sorted(SortField::UploadDate, SortOrder::Desc))
            .unwrap();
        assert_eq!(ids(&desc), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_search_unicode_case_insensitive() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add(entry("1", "ÉCOLE de Musique", 1), DuplicatePolicy::Skip).unwrap();
        catalog.add(entry("2", "Other", 1), DuplicatePolicy::Skip).unwrap();

        let hits = catalog
            .search(&SearchQuery::new("école").field(SearchField::Title))
            .unwrap();
        assert_eq!(ids(&hits), vec!["1"]);
    }

    #[test]
    fn test_search_matches_wildcards_literally() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add(entry("1", "100% pure", 1), DuplicatePolicy::Skip).unwrap();
        catalog.add(entry("2", "1000 ways", 1), DuplicatePolicy::Skip).unwrap();

        let hits = catalog.search(&SearchQuery::new("0%")).unwrap();
        assert_eq!(ids(&hits), vec!["1"]);
        let hits = catalog.search(&SearchQuery::new("_")).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_orders_like_list() {
        let mut catalog = Catalog::in_memory().unwrap();
        for (id, size, secs) in [("d", 200, 0), ("b", 500, 5), ("a", 200, 5), ("c", 200, 5)] {
            catalog
                .add_at(entry(id, "rust talk", size), DuplicatePolicy::Skip, at(secs))
                .unwrap();
        }
        catalog
            .add_at(entry("z", "unrelated", 900), DuplicatePolicy::Skip, at(9))
            .unwrap();

        let by_size = |order, limit| {
            SearchQuery::new("Rust")
                .order_by(ListQuery::sorted(SortField::FileSize, order).limit(limit))
        };
        let hits = catalog.search(&by_size(SortOrder::Desc, 3)).unwrap();
        assert_eq!(ids(&hits), vec!["b", "a", "c"]);
        let hits = catalog.search(&by_size(SortOrder::Asc, 10)).unwrap();
        assert_eq!(ids(&hits), vec!["a", "c", "d", "b"]);

        // Default is newest first, equal timestamps by id.
        let hits = catalog.search(&SearchQuery::new("talk")).unwrap();
        assert_eq!(ids(&hits), vec!["a", "b", "c", "d"]);
        assert_eq!(
            ids(&hits),
            ids(&catalog.list(&ListQuery::default()).unwrap())
                .into_iter()
                .filter(|id| *id != "z")
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_search_empty_query_rejected() {
        let catalog = Catalog::in_memory().unwrap();
        let err = catalog.search(&SearchQuery::new("   ")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_stats_empty_catalog() {
        let mut catalog = Catalog::in_memory().unwrap();
        let stats = catalog.stats().unwrap();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.last_added, None);
        assert_eq!(stats.transcripts, 0);
    }

    #[test]
    fn test_stats_reports_latest_added_at() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add_at(entry("a", "A", 100), DuplicatePolicy::Skip, at(30)).unwrap();
        catalog.add_at(entry("b", "B", 200), DuplicatePolicy::Skip, at(10)).unwrap();

        let stats = catalog.stats().unwrap();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.total_size, 300);
        assert_eq!(stats.last_added, Some(at(30)));
    }

    #[test]
    fn test_transcripts_upsert_per_language() {
        let mut catalog = Catalog::in_memory().unwrap();
        catalog.add(entry("abc", "A", 1), DuplicatePolicy::Skip).unwrap();

        let mut record = TranscriptRecord {
            entry_id: "abc".to_string(),
            language: "en".to_string(),
            filepath: PathBuf::from("/videos/abc.en.vtt"),
            auto_generated: true,
        };
        catalog.add_transcript(&record).unwrap();
        record.filepath = PathBuf::from("/videos/abc.en.srt");
        catalog.add_transcript(&record).unwrap();

        let stored = catalog.transcripts("abc").unwrap();
        assert_eq!(stored, vec![record]);
        assert_eq!(catalog.stats().unwrap().transcripts, 1);
    }

    #[test]
    fn test_transcript_for_unknown_entry_fails() {
        let mut catalog = Catalog::in_memory().unwrap();
        let err = catalog
            .add_transcript(&TranscriptRecord {
                entry_id: "missing".to_string(),
                language: "en".to_string(),
                filepath: PathBuf::from("/tmp/x.vtt"),
                auto_generated: false,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Storage { op: "add_transcript", .. }));
    }

    #[test]
    fn test_reopen_file_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("collection.db");

        let mut catalog = Catalog::open(&path).unwrap();
        catalog.add(entry("abc", "A", 7), DuplicatePolicy::Skip).unwrap();
        catalog.close().unwrap();

        let catalog = Catalog::open(&path).unwrap();
        assert_eq!(catalog.path(), Some(path.as_path()));
        assert_eq!(catalog.get("abc").unwrap().unwrap().file_size, 7);
    }
}
