//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the MediaStore trait.

use crate::media::{MediaKind, MediaRecord, MediaTriple};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{MediaStore, StorageError, StorageResult};
use crate::storage::{MediaPage, MediaQuery};
use chrono::{SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Rows per multi-row INSERT statement
///
/// Four bound parameters per row; this keeps each statement well under
/// SQLite's 32766 host parameter limit.
const MAX_ROWS_PER_STATEMENT: usize = 5000;

const SELECT_COLUMNS: &str = "id, original_url, media_url, type, created_at";

impl ToSql for MediaKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_db_string()))
    }
}

impl FromSql for MediaKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        MediaKind::from_db_string(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown media type '{}'", s).into()))
    }
}

/// SQLite storage backend
///
/// The connection sits behind a mutex so one instance can be shared between
/// the ingestion worker and concurrent HTTP handlers.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA mmap_size = 268435456;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a private in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

/// Builds `INSERT ... VALUES (?, ?, ?, ?), (?, ?, ?, ?), ...` for `rows` rows
fn bulk_insert_sql(rows: usize) -> String {
    let mut sql = String::with_capacity(80 + rows * 15);
    sql.push_str("INSERT INTO media_item (original_url, media_url, type, created_at) VALUES ");
    for i in 0..rows {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str("(?, ?, ?, ?)");
    }
    sql
}

/// Builds the WHERE clause and its bound values for a query
fn filter_clause(query: &MediaQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(kind) = query.kind {
        clauses.push("type = ?");
        values.push(Value::Text(kind.to_db_string().to_string()));
    }

    if let Some(term) = query.search_term() {
        // LIKE is case-insensitive for ASCII in SQLite
        clauses.push("original_url LIKE ? ESCAPE '\\'");
        values.push(Value::Text(format!("%{}%", escape_like(term))));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

/// Escapes LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaRecord> {
    Ok(MediaRecord {
        id: row.get(0)?,
        original_url: row.get(1)?,
        media_url: row.get(2)?,
        kind: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl MediaStore for SqliteStorage {
    fn insert_batch(&self, triples: &[MediaTriple]) -> StorageResult<usize> {
        if triples.is_empty() {
            return Ok(0);
        }

        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut inserted = 0;
        for chunk in triples.chunks(MAX_ROWS_PER_STATEMENT) {
            let sql = bulk_insert_sql(chunk.len());
            let mut params: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() * 4);
            for triple in chunk {
                params.push(&triple.source_url);
                params.push(&triple.media_url);
                params.push(&triple.kind);
                params.push(&created_at);
            }
            inserted += tx.execute(&sql, params.as_slice())?;
        }

        // Dropping the transaction rolls the partial batch back
        if inserted != triples.len() {
            return Err(StorageError::Database(format!(
                "bulk insert wrote {} of {} rows",
                inserted,
                triples.len()
            )));
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn query_media(&self, query: &MediaQuery) -> StorageResult<MediaPage> {
        let (where_sql, values) = filter_clause(query);
        let size = query.size.max(1);

        let conn = self.lock()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM media_item{}", where_sql),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let mut page_values = values;
        page_values.push(Value::Integer(i64::from(size)));
        page_values.push(Value::Integer(
            i64::try_from(query.offset()).unwrap_or(i64::MAX),
        ));

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM media_item{} ORDER BY id DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS, where_sql
        ))?;

        let records = stmt
            .query_map(params_from_iter(page_values.iter()), row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MediaPage {
            records,
            total_elements: total as u64,
            page: query.page,
            size,
        })
    }

    fn count_by_kind(&self, kind: MediaKind) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM media_item WHERE type = ?1",
            [&kind],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_total(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM media_item", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
