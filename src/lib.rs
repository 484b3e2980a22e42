//! # sluice
//!
//! Transactional execution layer for schema migrations.
//!
//! A [`TransactionalExecutor`] owns one database [`Session`] and runs the SQL a
//! migration produces under explicit transaction control. Statements can be
//! previewed instead of executed, and the existence checks migrations use to
//! stay idempotent (schemas, tables, columns, constraints, indexes) are
//! answered against the live catalog.
//!
//! ## Quick Start
//!
//! ```rust
//! use sluice::sqlite::rusqlite::SqliteSession;
//! use sluice::{ExecutionContext, TransactionalExecutor};
//!
//! # fn main() -> sluice::Result<()> {
//! TransactionalExecutor::scope(SqliteSession::in_memory(), ExecutionContext::new(), |exec| {
//!     exec.begin_transaction()?;
//!     if !exec.table_exists(None, "users")? {
//!         exec.execute("CREATE TABLE {0} (id INTEGER PRIMARY KEY)", &[&"users"])?;
//!     }
//!     assert!(exec.table_exists(None, "users")?);
//!     exec.commit_transaction()
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Database Support
//!
//! | Database   | Driver   | Feature Flag    |
//! |------------|----------|-----------------|
//! | SQLite     | rusqlite | `rusqlite`      |
//! | PostgreSQL | postgres | `postgres-sync` |
//!
//! Script revisions pulled from source control live in [`migrations`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod postgres;
pub mod sqlite;

pub use sluice_core::{
    Capabilities, ColumnMeta, DataTable, Dialect, ExecutionContext, ExistenceQuery, ObjectKind,
    Result, Session, SluiceError, SqlSink, TableSchema, TracingSink, TransactionState,
    TransactionalExecutor, Value, escape_literal, format_template,
};

/// Version-controlled script resolution.
pub use sluice_migrations as migrations;
