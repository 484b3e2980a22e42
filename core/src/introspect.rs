//! Existence checks used by migrations to stay idempotent.
//!
//! "Not found" is always `Ok(false)`; only genuine connectivity or query
//! failures propagate. Checks are read-only and never begin a transaction of
//! their own: they run in whatever transaction is already open.

use core::fmt::Display;

use crate::error::{Result, SluiceError};
use crate::executor::TransactionalExecutor;
use crate::existence::ExistenceQuery;
use crate::session::Session;
use crate::sluice_trace_query;
use crate::template::format_template;

impl<S: Session> TransactionalExecutor<S> {
    /// Formats and runs `template`, returning whether it yielded any row.
    pub fn exists(&mut self, template: &str, args: &[&dyn Display]) -> Result<bool> {
        let sql = format_template(template, args)?;
        self.probe(&sql)
    }

    /// `true` for an empty name or the default schema (case-insensitive).
    ///
    /// Backends without schema support reject any other name with
    /// [`SluiceError::UnsupportedFeature`].
    pub fn schema_exists(&mut self, schema: &str) -> Result<bool> {
        let caps = self.capabilities();
        if schema.is_empty() || schema.eq_ignore_ascii_case(caps.default_schema()) {
            return Ok(true);
        }
        if !caps.supports_schemas {
            return Err(SluiceError::UnsupportedFeature(format!(
                "schemas are not supported by {}",
                caps.dialect
            )));
        }
        self.probe_query(&ExistenceQuery::schema(schema))
    }

    pub fn table_exists(&mut self, schema: Option<&str>, table: &str) -> Result<bool> {
        self.probe_query(&ExistenceQuery::table(schema, table))
    }

    pub fn column_exists(&mut self, schema: Option<&str>, table: &str, column: &str) -> Result<bool> {
        self.probe_query(&ExistenceQuery::column(schema, table, column))
    }

    pub fn constraint_exists(
        &mut self,
        schema: Option<&str>,
        table: &str,
        constraint: &str,
    ) -> Result<bool> {
        self.probe_query(&ExistenceQuery::constraint(schema, table, constraint))
    }

    pub fn index_exists(&mut self, schema: Option<&str>, table: &str, index: &str) -> Result<bool> {
        self.probe_query(&ExistenceQuery::index(schema, table, index))
    }

    fn probe_query(&mut self, query: &ExistenceQuery) -> Result<bool> {
        let sql = query.to_sql(self.capabilities().dialect);
        self.probe(&sql)
    }

    fn probe(&mut self, sql: &str) -> Result<bool> {
        self.ensure_open()?;
        sluice_trace_query!(sql, "exists");
        self.session.has_rows(sql)
    }
}
