//! Statement execution: the `Process` primitive and everything built on it.

use core::fmt::Display;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SluiceError};
use crate::executor::TransactionalExecutor;
use crate::session::Session;
use crate::sluice_trace_query;
use crate::template::format_template;

impl<S: Session> TransactionalExecutor<S> {
    /// Formats `template` with positional `args` and runs it as one statement.
    ///
    /// ```ignore
    /// executor.execute("CREATE INDEX {0} ON {1} ({2})", &[&"ix_name", &"users", &"name"])?;
    /// ```
    pub fn execute(&mut self, template: &str, args: &[&dyn Display]) -> Result<()> {
        let sql = format_template(template, args)?;
        self.process(&sql)
    }

    /// Runs one statement.
    ///
    /// The SQL is reported to the sink first, so previews and real runs are
    /// equally auditable. In preview mode, or for an empty statement, nothing
    /// touches the database. Otherwise the session is opened and a transaction
    /// begun as needed. A failure is surfaced as
    /// [`SluiceError::Execution`] carrying the literal SQL; it is never retried.
    pub fn process(&mut self, sql: &str) -> Result<()> {
        self.sink.report(sql);

        if self.context.preview_only() || sql.trim().is_empty() {
            return Ok(());
        }

        self.ensure_transaction()?;

        let timeout = self.effective_timeout();
        sluice_trace_query!(sql, "process");
        self.session
            .execute(sql, timeout)
            .map(|_| ())
            .map_err(|e| match e {
                SluiceError::Execution { reason, .. } => SluiceError::execution(sql, reason),
                other => SluiceError::execution(sql, other),
            })
    }

    /// Issues data-insert statements, one per row.
    ///
    /// When `batch` is requested the rows are joined into a single batch,
    /// unless the backend can only take one row per statement.
    pub fn process_insert<T: AsRef<str>>(&mut self, row_statements: &[T], batch: bool) -> Result<()> {
        if batch && !self.capabilities().insert_rows_separately {
            let joined = row_statements
                .iter()
                .map(|s| s.as_ref().trim().trim_end_matches(';'))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(";\n");
            return self.process(&joined);
        }

        for statement in row_statements {
            self.process(statement.as_ref())?;
        }
        Ok(())
    }

    /// Reads a script file and runs its contents through [`process`](Self::process).
    pub fn execute_script(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let sql = std::fs::read_to_string(path.as_ref())?;
        self.process(&sql)
    }

    /// Hands the live session to `op` inside the active transaction.
    ///
    /// Escape hatch for logic that the statement API cannot express. Errors
    /// raised by `op` are returned as-is.
    pub fn perform_operation<R>(&mut self, op: impl FnOnce(&mut S) -> Result<R>) -> Result<R> {
        self.ensure_transaction()?;
        op(&mut self.session)
    }

    /// Backends that cannot honor a finite timeout always run with it disabled.
    fn effective_timeout(&self) -> Option<Duration> {
        if self.capabilities().honors_command_timeout {
            self.context.command_timeout()
        } else {
            Some(Duration::ZERO)
        }
    }
}
