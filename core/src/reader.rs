//! Read queries for data export.

use core::fmt::Display;

use crate::error::Result;
use crate::executor::TransactionalExecutor;
use crate::session::Session;
use crate::template::format_template;
use crate::value::{DataTable, TableSchema};
use crate::{sluice_trace_query, sluice_trace_warn};

impl<S: Session> TransactionalExecutor<S> {
    /// Formats and runs a read query, materializing every row.
    pub fn read(&mut self, template: &str, args: &[&dyn Display]) -> Result<DataTable> {
        let sql = format_template(template, args)?;
        self.ensure_open()?;
        sluice_trace_query!(sql, "read");
        self.session.query(&sql)
    }

    /// Every row and column of `table`.
    pub fn read_table_data(&mut self, schema: Option<&str>, table: &str) -> Result<DataTable> {
        let target = self.qualified_name(schema, table);
        self.read("SELECT * FROM {0}", &[&target])
    }

    /// Column metadata of `table`, probed with a query that returns no rows.
    ///
    /// Best effort: any failure, a missing table included, yields
    /// [`TableSchema::NotAvailable`] instead of an error.
    pub fn get_table_schema(&mut self, schema: Option<&str>, table: &str) -> TableSchema {
        let sql = format!("SELECT * FROM {} WHERE 1 = 2", self.qualified_name(schema, table));
        let described = self
            .ensure_open()
            .and_then(|()| {
                sluice_trace_query!(sql, "describe");
                self.session.describe(&sql)
            });

        match described {
            Ok(columns) => TableSchema::Found(columns),
            Err(e) => {
                sluice_trace_warn!(table = table, error = %e, "table schema not available");
                TableSchema::NotAvailable
            }
        }
    }

    /// Prefixes `table` with `schema` when the backend understands schemas.
    fn qualified_name(&self, schema: Option<&str>, table: &str) -> String {
        match schema {
            Some(schema) if !schema.is_empty() && self.capabilities().supports_schemas => {
                format!("{schema}.{table}")
            }
            _ => table.to_string(),
        }
    }
}
