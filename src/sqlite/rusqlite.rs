use std::path::PathBuf;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Statement};
use sluice_core::{Capabilities, ColumnMeta, DataTable, Result, Session, SluiceError, Value};

/// Where a [`SqliteSession`] connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteTarget {
    /// A private in-memory database. Its contents are lost whenever the
    /// session closes.
    Memory,
    File(PathBuf),
}

/// [`Session`] over a rusqlite connection.
///
/// The connection is opened lazily by the executor and transactions are
/// driven with plain `BEGIN`/`COMMIT`/`ROLLBACK` statements, so every
/// statement issued in between runs inside them.
#[derive(Debug)]
pub struct SqliteSession {
    target: SqliteTarget,
    conn: Option<Connection>,
    caps: Capabilities,
}

impl SqliteSession {
    pub fn new(target: SqliteTarget) -> Self {
        Self {
            target,
            conn: None,
            caps: Capabilities::sqlite(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(SqliteTarget::File(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::new(SqliteTarget::Memory)
    }

    /// Forces data inserts to be issued one row per statement.
    pub fn with_insert_rows_separately(mut self, separately: bool) -> Self {
        self.caps = self.caps.with_insert_rows_separately(separately);
        self
    }

    #[inline]
    pub fn target(&self) -> &SqliteTarget {
        &self.target
    }

    /// Gets a reference to the underlying connection, if open
    #[inline]
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SluiceError::Connection("sqlite session is not open".to_string()))
    }
}

fn column_meta(stmt: &Statement<'_>) -> Vec<ColumnMeta> {
    stmt.columns()
        .iter()
        .enumerate()
        .map(|(ordinal, column)| {
            ColumnMeta::new(column.name(), ordinal, column.decl_type().map(str::to_string))
        })
        .collect()
}

fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

fn query_error(e: rusqlite::Error) -> SluiceError {
    SluiceError::Query(e.to_string())
}

impl Session for SqliteSession {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn open(&mut self) -> Result<()> {
        let conn = match &self.target {
            SqliteTarget::Memory => Connection::open_in_memory(),
            SqliteTarget::File(path) => Connection::open(path),
        }
        .map_err(|e| SluiceError::Connection(e.to_string()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(target_db = ?self.target, "sqlite session opened");

        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| SluiceError::Connection(e.to_string())),
            None => Ok(()),
        }
    }

    fn begin(&mut self) -> Result<()> {
        self.conn()?
            .execute_batch("BEGIN")
            .map_err(|e| SluiceError::Transaction(e.to_string()))
    }

    fn commit(&mut self) -> Result<()> {
        self.conn()?
            .execute_batch("COMMIT")
            .map_err(|e| SluiceError::Transaction(e.to_string()))
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn()?
            .execute_batch("ROLLBACK")
            .map_err(|e| SluiceError::Transaction(e.to_string()))
    }

    // SQLite has no per-statement timeout; the executor always passes zero.
    fn execute(&mut self, sql: &str, _timeout: Option<Duration>) -> Result<u64> {
        let conn = self.conn()?;
        conn.execute_batch(sql)
            .map_err(|e| SluiceError::execution(sql, e))?;
        Ok(conn.changes() as u64)
    }

    fn query(&mut self, sql: &str) -> Result<DataTable> {
        let mut stmt = self.conn()?.prepare(sql).map_err(query_error)?;
        let columns = column_meta(&stmt);
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(query_error)?;
        while let Some(row) = cursor.next().map_err(query_error)? {
            let values = (0..width)
                .map(|i| row.get_ref(i).map(to_value))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_error)?;
            rows.push(values);
        }

        Ok(DataTable::new(columns, rows))
    }

    fn describe(&mut self, sql: &str) -> Result<Vec<ColumnMeta>> {
        let stmt = self.conn()?.prepare(sql).map_err(query_error)?;
        Ok(column_meta(&stmt))
    }

    fn has_rows(&mut self, sql: &str) -> Result<bool> {
        let mut stmt = self.conn()?.prepare(sql).map_err(query_error)?;
        stmt.exists([]).map_err(query_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_cycle() {
        let mut session = SqliteSession::in_memory();
        assert!(!session.is_open());

        session.open().unwrap();
        assert!(session.is_open());
        assert!(session.connection().is_some());

        session.close().unwrap();
        session.close().unwrap();
        assert!(!session.is_open());
    }

    #[test]
    fn operations_on_a_closed_session_fail_with_connection_error() {
        let mut session = SqliteSession::in_memory();
        assert!(matches!(session.begin(), Err(SluiceError::Connection(_))));
        assert!(matches!(session.query("SELECT 1"), Err(SluiceError::Connection(_))));
    }

    #[test]
    fn query_materializes_typed_values() {
        let mut session = SqliteSession::in_memory();
        session.open().unwrap();
        session
            .execute(
                "CREATE TABLE t (i INTEGER, r REAL, s TEXT, b BLOB, n TEXT);
                 INSERT INTO t VALUES (1, 2.5, 'x', x'0102', NULL);",
                None,
            )
            .unwrap();

        let table = session.query("SELECT * FROM t").unwrap();
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.columns[2].declared_type.as_deref(), Some("TEXT"));
        assert_eq!(
            table.rows,
            [vec![
                Value::Integer(1),
                Value::Real(2.5),
                Value::Text("x".into()),
                Value::Blob(vec![1, 2]),
                Value::Null,
            ]]
        );
    }

    #[test]
    fn insert_rows_separately_is_configurable() {
        let session = SqliteSession::in_memory();
        assert!(!session.capabilities().insert_rows_separately);

        let session = session.with_insert_rows_separately(true);
        assert!(session.capabilities().insert_rows_separately);
    }
}
