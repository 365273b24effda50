//! The `SQLite` backend.
//!
//! One connection holds every table so that a group deletion can reparent
//! children, detach associations and remove rows in a single transaction.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params};

use super::connection::{acquire_lock, configure_connection};
use super::metrics::record_operation_metrics;
use crate::models::{Group, GroupId, Link, LinkId, OwnerId, Tag, TagId};
use crate::{Error, Result};

/// Columns selected for [`group_from_row`].
pub(crate) const GROUP_COLUMNS: &str =
    "g.id, g.title, g.parent_group_id, g.user_id, g.created_at, g.updated_at";

/// Columns selected for [`link_from_row`].
pub(crate) const LINK_COLUMNS: &str = "l.id, l.title, l.url, l.user_id, l.created_at";

/// Columns selected for [`tag_from_row`].
pub(crate) const TAG_COLUMNS: &str = "t.id, t.name, t.user_id";

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        parent_group_id INTEGER NULL REFERENCES groups(id),
        user_id INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_groups_user_parent ON groups(user_id, parent_group_id);

    CREATE TABLE IF NOT EXISTS links (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_links_user ON links(user_id, created_at);

    -- Links (and future groupable entities) filed under groups
    CREATE TABLE IF NOT EXISTS groupables (
        group_id INTEGER NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
        groupable_type TEXT NOT NULL,
        groupable_id INTEGER NOT NULL,
        PRIMARY KEY (group_id, groupable_type, groupable_id)
    );

    CREATE INDEX IF NOT EXISTS idx_groupables_target ON groupables(groupable_type, groupable_id);

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        UNIQUE (user_id, name)
    );

    CREATE TABLE IF NOT EXISTS taggables (
        tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        taggable_type TEXT NOT NULL,
        taggable_id INTEGER NOT NULL,
        PRIMARY KEY (tag_id, taggable_type, taggable_id)
    );

    CREATE INDEX IF NOT EXISTS idx_taggables_target ON taggables(taggable_type, taggable_id);
";

/// SQLite-based storage for groups, links and tags.
pub struct SqliteBackend {
    /// Database connection (mutex for interior mutability).
    conn: Mutex<Connection>,
    /// Path to the database file, `None` for in-memory databases.
    db_path: Option<PathBuf>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path`.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::operation("create_database_dir", e))?;
        }

        let conn = Connection::open(path).map_err(|e| Error::operation("open_database", e))?;
        let backend = Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
        };
        backend.initialize()?;
        Ok(backend)
    }

    /// Creates an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::operation("open_database_memory", e))?;
        let backend = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        backend.initialize()?;
        Ok(backend)
    }

    /// Returns the default database path.
    ///
    /// The path is `<data dir>/linkshelf/linkshelf.db`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|d| d.data_dir().join("linkshelf").join("linkshelf.db"))
    }

    /// Returns the database path, `None` for in-memory databases.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::operation("initialize_schema", e))?;
        tracing::debug!(path = ?self.db_path, "SQLite schema ready");
        Ok(())
    }

    /// Runs a read against the connection, recording metrics.
    pub(crate) fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        let conn = acquire_lock(&self.conn);
        let result = f(&conn);
        record_operation_metrics(operation, start, &result);
        result
    }

    /// Runs `f` inside an immediate transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise,
    /// so every row change made by `f` lands together or not at all.
    pub(crate) fn write<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        let mut conn = acquire_lock(&self.conn);
        let result = in_transaction(&mut conn, f);
        record_operation_metrics(operation, start, &result);
        result
    }
}

fn in_transaction<T>(
    conn: &mut Connection,
    f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| Error::operation("begin_transaction", e))?;
    let value = f(&tx)?;
    tx.commit()
        .map_err(|e| Error::operation("commit_transaction", e))?;
    Ok(value)
}

/// Converts a count column to `u64`.
pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Maps a row selected with [`GROUP_COLUMNS`].
pub(crate) fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: GroupId::new(row.get(0)?),
        title: row.get(1)?,
        parent_group_id: row.get::<_, Option<i64>>(2)?.map(GroupId::new),
        owner_id: OwnerId::new(row.get(3)?),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Maps a row selected with [`LINK_COLUMNS`].
pub(crate) fn link_from_row(row: &Row<'_>) -> rusqlite::Result<Link> {
    Ok(Link {
        id: LinkId::new(row.get(0)?),
        title: row.get(1)?,
        url: row.get(2)?,
        owner_id: OwnerId::new(row.get(3)?),
        created_at: row.get(4)?,
    })
}

/// Maps a row selected with [`TAG_COLUMNS`].
pub(crate) fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: TagId::new(row.get(0)?),
        name: row.get(1)?,
        owner_id: OwnerId::new(row.get(2)?),
    })
}

/// Loads a group owned by `owner`.
pub(crate) fn fetch_group(conn: &Connection, owner: OwnerId, id: GroupId) -> Result<Option<Group>> {
    conn.query_row(
        &format!("SELECT {GROUP_COLUMNS} FROM groups g WHERE g.id = ?1 AND g.user_id = ?2"),
        params![id.get(), owner.get()],
        group_from_row,
    )
    .optional()
    .map_err(|e| Error::operation("get_group", e))
}

/// Loads a link owned by `owner`.
pub(crate) fn fetch_link(conn: &Connection, owner: OwnerId, id: LinkId) -> Result<Option<Link>> {
    conn.query_row(
        &format!("SELECT {LINK_COLUMNS} FROM links l WHERE l.id = ?1 AND l.user_id = ?2"),
        params![id.get(), owner.get()],
        link_from_row,
    )
    .optional()
    .map_err(|e| Error::operation("get_link", e))
}

/// Loads a tag owned by `owner`.
pub(crate) fn fetch_tag(conn: &Connection, owner: OwnerId, id: TagId) -> Result<Option<Tag>> {
    conn.query_row(
        &format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.id = ?1 AND t.user_id = ?2"),
        params![id.get(), owner.get()],
        tag_from_row,
    )
    .optional()
    .map_err(|e| Error::operation("get_tag", e))
}
