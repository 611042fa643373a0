//! Part repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide one-statement persistence primitives over the `parts` table.
//! - Convert persisted rows into `Part` values, rejecting invalid state.
//!
//! # Invariants
//! - Every read and write is filtered to live rows (`deleted_at IS NULL`).
//! - Soft delete never removes a row.
//! - Each call honors its `CallContext` before touching storage and between
//!   cursor steps.

use crate::context::{CallContext, Interrupted};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::part::{Part, PartDraft, PartId};
use crate::model::timestamp::{Timestamp, TimestampError};
use rusqlite::{params, Connection, Row, Rows};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PART_SELECT_SQL: &str = "SELECT
    id,
    manufacturer_id,
    vendor_code,
    created_at
FROM parts";

const REQUIRED_PART_COLUMNS: [&str; 5] = [
    "id",
    "manufacturer_id",
    "vendor_code",
    "created_at",
    "deleted_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from part persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Statement preparation or execution failed.
    Db(DbError),
    /// The call was cancelled or ran past its deadline.
    Interrupted(Interrupted),
    /// The call was interrupted after a multi-row cursor was opened.
    ScanInterrupted(Interrupted),
    /// A column of a fetched row could not be read.
    RowScan(rusqlite::Error),
    /// Advancing a multi-row cursor failed.
    Cursor(rusqlite::Error),
    /// A stored `created_at` has no valid timestamp representation.
    InvalidTimestamp {
        id: PartId,
        source: TimestampError,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Interrupted(err) | Self::ScanInterrupted(err) => write!(f, "{err}"),
            Self::RowScan(err) => write!(f, "{err}"),
            Self::Cursor(err) => write!(f, "{err}"),
            Self::InvalidTimestamp { id, source } => {
                write!(f, "part {id} has invalid created_at: {source}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "part repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "part repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "part repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Interrupted(err) | Self::ScanInterrupted(err) => Some(err),
            Self::RowScan(err) => Some(err),
            Self::Cursor(err) => Some(err),
            Self::InvalidTimestamp { source, .. } => Some(source),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<Interrupted> for RepoError {
    fn from(value: Interrupted) -> Self {
        Self::Interrupted(value)
    }
}

/// Storage contract consumed by the part service.
///
/// Each method issues exactly one statement.
pub trait PartRepository {
    /// Inserts a live part and returns the store-assigned id.
    fn insert_part(&self, ctx: &CallContext, draft: &PartDraft) -> RepoResult<PartId>;
    /// Fetches one live part.
    fn find_live_part(&self, ctx: &CallContext, id: PartId) -> RepoResult<Option<Part>>;
    /// Rewrites the mutable fields of a live part. Returns affected rows.
    fn update_live_part(&self, ctx: &CallContext, id: PartId, draft: &PartDraft)
        -> RepoResult<usize>;
    /// Marks a live part deleted. Returns affected rows.
    fn soft_delete_part(&self, ctx: &CallContext, id: PartId) -> RepoResult<usize>;
    /// Lists every live part, ordered by id. Fails on the first bad row.
    fn list_live_parts(&self, ctx: &CallContext) -> RepoResult<Vec<Part>>;
}

/// SQLite-backed part repository.
pub struct SqlitePartRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePartRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when `parts` does not
    ///   have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_part_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PartRepository for SqlitePartRepository<'_> {
    fn insert_part(&self, ctx: &CallContext, draft: &PartDraft) -> RepoResult<PartId> {
        ctx.check()?;

        let id = self.conn.query_row(
            "INSERT INTO parts (manufacturer_id, vendor_code)
             VALUES (?1, ?2)
             RETURNING id;",
            params![draft.manufacturer_id, draft.vendor_code.as_str()],
            |row| row.get::<_, PartId>(0),
        )?;

        Ok(id)
    }

    fn find_live_part(&self, ctx: &CallContext, id: PartId) -> RepoResult<Option<Part>> {
        ctx.check()?;

        let mut stmt = self.conn.prepare(&format!(
            "{PART_SELECT_SQL}
             WHERE id = ?1
               AND deleted_at IS NULL;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_part_row(row)?));
        }

        Ok(None)
    }

    fn update_live_part(
        &self,
        ctx: &CallContext,
        id: PartId,
        draft: &PartDraft,
    ) -> RepoResult<usize> {
        ctx.check()?;

        let changed = self.conn.execute(
            "UPDATE parts
             SET
                manufacturer_id = ?1,
                vendor_code = ?2
             WHERE id = ?3
               AND deleted_at IS NULL;",
            params![draft.manufacturer_id, draft.vendor_code.as_str(), id],
        )?;

        Ok(changed)
    }

    fn soft_delete_part(&self, ctx: &CallContext, id: PartId) -> RepoResult<usize> {
        ctx.check()?;

        let changed = self.conn.execute(
            "UPDATE parts
             SET deleted_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND deleted_at IS NULL;",
            [id],
        )?;

        Ok(changed)
    }

    fn list_live_parts(&self, ctx: &CallContext) -> RepoResult<Vec<Part>> {
        ctx.check()?;

        let mut stmt = self.conn.prepare(&format!(
            "{PART_SELECT_SQL}
             WHERE deleted_at IS NULL
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        collect_parts(ctx, &mut rows)
    }
}

/// Drains an open cursor, checking `ctx` before every step.
fn collect_parts(ctx: &CallContext, rows: &mut Rows<'_>) -> RepoResult<Vec<Part>> {
    let mut parts = Vec::new();

    loop {
        ctx.check().map_err(RepoError::ScanInterrupted)?;
        match rows.next().map_err(RepoError::Cursor)? {
            Some(row) => parts.push(parse_part_row(row)?),
            None => break,
        }
    }

    Ok(parts)
}

fn parse_part_row(row: &Row<'_>) -> RepoResult<Part> {
    let id: PartId = row.get("id").map_err(RepoError::RowScan)?;
    let manufacturer_id: i64 = row.get("manufacturer_id").map_err(RepoError::RowScan)?;
    let vendor_code: String = row.get("vendor_code").map_err(RepoError::RowScan)?;
    let created_at_ms: i64 = row.get("created_at").map_err(RepoError::RowScan)?;

    let created_at = Timestamp::from_epoch_millis(created_at_ms)
        .map_err(|source| RepoError::InvalidTimestamp { id, source })?;

    Ok(Part {
        id,
        manufacturer_id,
        vendor_code,
        created_at,
    })
}

fn ensure_part_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "parts")? {
        return Err(RepoError::MissingRequiredTable("parts"));
    }

    for column in REQUIRED_PART_COLUMNS {
        if !table_has_column(conn, "parts", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "parts",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
