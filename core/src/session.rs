//! The database session abstraction every backend adapter implements.
//!
//! The executor owns exactly one session for its lifetime. Sessions are
//! synchronous: every call blocks until the backend answers.

use std::time::Duration;

use crate::dialect::Capabilities;
use crate::error::Result;
use crate::value::{ColumnMeta, DataTable};

pub trait Session {
    /// Capability flags of this backend adapter.
    fn capabilities(&self) -> Capabilities;

    fn is_open(&self) -> bool;

    /// Opens the underlying connection. Failures surface as
    /// [`SluiceError::Connection`](crate::SluiceError::Connection).
    fn open(&mut self) -> Result<()>;

    /// Closes the underlying connection. Closing a closed session is a no-op.
    fn close(&mut self) -> Result<()>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// Runs a parameterless statement. `timeout` of `Some(Duration::ZERO)`
    /// means "no timeout"; `None` leaves the backend default in place.
    fn execute(&mut self, sql: &str, timeout: Option<Duration>) -> Result<u64>;

    /// Runs a query and drains every row before returning.
    fn query(&mut self, sql: &str) -> Result<DataTable>;

    /// Column metadata of the result shape of `sql`.
    fn describe(&mut self, sql: &str) -> Result<Vec<ColumnMeta>>;

    /// Whether `sql` yields at least one row.
    fn has_rows(&mut self, sql: &str) -> Result<bool> {
        Ok(!self.query(sql)?.is_empty())
    }
}
