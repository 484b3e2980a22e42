//! # sluice-core
//!
//! The execution core of the sluice schema-migration toolkit: it owns a
//! database [`Session`], runs DDL/DML under transactional control with
//! preview (dry-run) support, and answers the existence questions
//! ("does this table/column/index/constraint exist?") migrations ask to stay
//! idempotent.
//!
//! ```ignore
//! use sluice_core::{ExecutionContext, TransactionalExecutor};
//!
//! TransactionalExecutor::scope(session, ExecutionContext::new(), |exec| {
//!     exec.begin_transaction()?;
//!     if !exec.table_exists(None, "users")? {
//!         exec.execute("CREATE TABLE users (id INT)", &[])?;
//!     }
//!     exec.commit_transaction()
//! })?;
//! ```
//!
//! The SQL text itself is produced upstream; this crate only decides how and
//! when it reaches the backend.

pub mod context;
pub mod dialect;
pub mod error;
pub mod existence;
pub mod executor;
pub mod session;
pub mod sink;
pub mod template;
pub mod tracing;
pub mod value;

mod introspect;
mod reader;
mod runner;

// Re-export key types and traits
pub use context::ExecutionContext;
pub use dialect::{Capabilities, Dialect};
pub use error::{Result, SluiceError};
pub use existence::{ExistenceQuery, ObjectKind, escape_literal};
pub use executor::{TransactionState, TransactionalExecutor};
pub use session::Session;
pub use sink::{SqlSink, TracingSink};
pub use template::format_template;
pub use value::{ColumnMeta, DataTable, TableSchema, Value};
