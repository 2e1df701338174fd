// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use checkit_app::{
    Collection, Item, ItemId, LISTS_KEY, ListId, ListStore, StorageError, StoreNotice, THEME_KEY,
    Theme, TodoList, decode_collection, encode_collection, now_millis,
};
use rusqlite::{Connection, OptionalExtension, params};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "checkit";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[("kv", &["key", "value", "updated_at"])];

const DEMO_LISTS: &[(&str, &[(&str, bool)])] = &[
    (
        "Groceries",
        &[
            ("Milk", true),
            ("Sourdough bread", false),
            ("Eggs", false),
            ("Coffee beans", true),
        ],
    ),
    (
        "Weekend Chores",
        &[
            ("Mow the lawn", false),
            ("Clean the gutters", false),
            ("Take out recycling", true),
        ],
    ),
    (
        "Camping Trip",
        &[
            ("Tent stakes", false),
            ("Headlamp batteries", false),
            ("Sunscreen", false),
        ],
    ),
    ("Someday", &[]),
];

/// SQLite-backed key/value storage holding the serialized collection and the
/// theme preference.
pub struct Store {
    conn: Connection,
    notices: RefCell<Vec<StoreNotice>>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        log::info!("opened database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            notices: RefCell::new(Vec::new()),
        }
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
            log::info!("created storage schema");
        }
        Ok(())
    }

    pub fn raw_get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("read key {key}"))
    }

    pub fn raw_put(&self, key: &str, value: &str) -> Result<()> {
        upsert(&self.conn, key, value)
    }

    /// The stored theme preference, if the user ever picked one. Unknown
    /// values read as light.
    pub fn load_theme(&self) -> Result<Option<Theme>> {
        let Some(raw) = self.raw_get(THEME_KEY)? else {
            return Ok(None);
        };
        match Theme::parse(raw.trim()) {
            Some(theme) => Ok(Some(theme)),
            None => {
                log::warn!("unknown theme preference {raw:?}; falling back to light");
                Ok(Some(Theme::Light))
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.raw_put(THEME_KEY, theme.as_str())
    }

    /// Fills an empty store with a handful of sample lists. A store that
    /// already holds lists is left alone.
    pub fn seed_demo_data(&self) -> Result<()> {
        if !self.load().is_empty() {
            return Ok(());
        }
        let mut collection = Collection::default();
        for (title, items) in DEMO_LISTS {
            let id = ListId::new(collection.fresh_id(now_millis()));
            collection.push(TodoList {
                id,
                title: (*title).to_owned(),
                items: Vec::new(),
            });
            for (text, completed) in *items {
                let item_id = ItemId::new(collection.fresh_id(now_millis()));
                let list_index = collection.len() - 1;
                if let Some(list) = collection.get_mut(list_index) {
                    list.items.push(Item {
                        id: item_id,
                        text: (*text).to_owned(),
                        completed: *completed,
                    });
                }
            }
        }
        self.save(&collection).context("save demo lists")?;
        log::info!("seeded {} demo lists", collection.len());
        Ok(())
    }

    /// Pretty JSON of the stored collection, in the persisted layout.
    pub fn export_json(&self) -> Result<String> {
        let collection = self.load();
        if let Some(notice) = self.drain_notices().into_iter().next() {
            bail!("{}; fix or remove the stored lists before exporting", notice.message());
        }
        serde_json::to_string_pretty(&collection).context("encode lists as JSON")
    }

    fn push_notice(&self, notice: StoreNotice) {
        self.notices.borrow_mut().push(notice);
    }
}

impl ListStore for Store {
    fn load(&self) -> Collection {
        let raw = match self.raw_get(LISTS_KEY) {
            Ok(raw) => raw,
            Err(error) => {
                let error = StorageError::Read {
                    key: LISTS_KEY,
                    message: format!("{error:#}"),
                };
                log::warn!("{error}");
                self.push_notice(StoreNotice::ReadFailed {
                    detail: error.to_string(),
                });
                return Collection::default();
            }
        };
        let (collection, notice) = decode_collection(raw.as_deref());
        if let Some(notice) = notice {
            self.push_notice(notice);
        }
        collection
    }

    fn save(&self, collection: &Collection) -> Result<(), StorageError> {
        let payload = encode_collection(collection)?;
        let write_error = |error: anyhow::Error| StorageError::Write {
            key: LISTS_KEY,
            message: format!("{error:#}"),
        };
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin save transaction")
            .map_err(write_error)?;
        upsert(&tx, LISTS_KEY, &payload).map_err(write_error)?;
        tx.commit()
            .context("commit save transaction")
            .map_err(write_error)?;
        log::debug!("saved {} lists", collection.len());
        Ok(())
    }

    fn drain_notices(&self) -> Vec<StoreNotice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CHECKIT_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    Ok(data_dir()?.join("checkit.db"))
}

/// Platform data directory for checkit, created on demand. Log files live here.
pub fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CHECKIT_DB_PATH to a writable database path")
    })?;
    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn upsert(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = now_rfc3339()?;
    conn.execute(
        "
        INSERT INTO kv (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
          value = excluded.value,
          updated_at = excluded.updated_at
        ",
        params![key, value, now],
    )
    .with_context(|| format!("upsert key {key}"))?;
    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; point --config or CHECKIT_DB_PATH at a checkit database"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; move the file aside and relaunch to start fresh",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
