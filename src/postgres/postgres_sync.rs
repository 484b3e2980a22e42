use std::time::Duration;

use postgres::{Client, NoTls, SimpleQueryMessage};
use sluice_core::{Capabilities, ColumnMeta, DataTable, Result, Session, SluiceError, Value};

const PROBE_SAVEPOINT: &str = "sluice_probe";

/// [`Session`] over the blocking `postgres` client.
///
/// Statements go through the simple query protocol, so result values come
/// back as text.
pub struct PostgresSession {
    params: String,
    client: Option<Client>,
    in_transaction: bool,
}

impl PostgresSession {
    /// `params` is a libpq-style connection string or URL.
    pub fn new(params: impl Into<String>) -> Self {
        Self {
            params: params.into(),
            client: None,
            in_transaction: false,
        }
    }

    /// Gets a mutable reference to the underlying client, if connected
    pub fn client_mut(&mut self) -> Option<&mut Client> {
        self.client.as_mut()
    }

    fn client(&mut self) -> Result<&mut Client> {
        self.client
            .as_mut()
            .ok_or_else(|| SluiceError::Connection("postgres session is not open".to_string()))
    }

    fn transaction_statement(&mut self, sql: &str) -> Result<()> {
        self.client()?
            .batch_execute(sql)
            .map_err(|e| SluiceError::Transaction(e.to_string()))
    }
}

impl std::fmt::Debug for PostgresSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSession")
            .field("connected", &self.client.is_some())
            .field("in_transaction", &self.in_transaction)
            .finish_non_exhaustive()
    }
}

fn query_error(e: postgres::Error) -> SluiceError {
    SluiceError::Query(e.to_string())
}

/// `SET LOCAL` scopes the timeout to the running transaction.
fn timeout_statement(timeout: Duration, in_transaction: bool) -> String {
    let scope = if in_transaction { "SET LOCAL" } else { "SET" };
    format!("{scope} statement_timeout = {}", timeout.as_millis())
}

impl Session for PostgresSession {
    fn capabilities(&self) -> Capabilities {
        Capabilities::postgres()
    }

    fn is_open(&self) -> bool {
        self.client.is_some()
    }

    fn open(&mut self) -> Result<()> {
        let client = Client::connect(&self.params, NoTls)
            .map_err(|e| SluiceError::Connection(e.to_string()))?;
        self.client = Some(client);
        self.in_transaction = false;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.in_transaction = false;
        match self.client.take() {
            Some(client) => client
                .close()
                .map_err(|e| SluiceError::Connection(e.to_string())),
            None => Ok(()),
        }
    }

    fn begin(&mut self) -> Result<()> {
        self.transaction_statement("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.in_transaction = false;
        self.transaction_statement("COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        self.in_transaction = false;
        self.transaction_statement("ROLLBACK")
    }

    fn execute(&mut self, sql: &str, timeout: Option<Duration>) -> Result<u64> {
        let in_transaction = self.in_transaction;
        let client = self.client()?;

        if let Some(timeout) = timeout {
            client
                .batch_execute(&timeout_statement(timeout, in_transaction))
                .map_err(|e| SluiceError::execution(sql, e))?;
        }

        let messages = client
            .simple_query(sql)
            .map_err(|e| SluiceError::execution(sql, e))?;

        Ok(messages
            .iter()
            .map(|m| match m {
                SimpleQueryMessage::CommandComplete(n) => *n,
                _ => 0,
            })
            .sum())
    }

    fn query(&mut self, sql: &str) -> Result<DataTable> {
        let messages = self.client()?.simple_query(sql).map_err(query_error)?;

        let mut table = DataTable::default();
        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) if table.columns.is_empty() => {
                    table.columns = columns
                        .iter()
                        .enumerate()
                        .map(|(i, c)| ColumnMeta::new(c.name(), i, None))
                        .collect();
                }
                SimpleQueryMessage::Row(row) => {
                    let values = (0..row.len())
                        .map(|i| match row.get(i) {
                            Some(text) => Value::Text(text.to_string()),
                            None => Value::Null,
                        })
                        .collect();
                    table.rows.push(values);
                }
                _ => {}
            }
        }
        Ok(table)
    }

    // A failed statement aborts the enclosing transaction, so the probe runs
    // under a savepoint that is rolled back on failure.
    fn describe(&mut self, sql: &str) -> Result<Vec<ColumnMeta>> {
        let guarded = self.in_transaction;
        let client = self.client()?;

        if guarded {
            client
                .batch_execute(&format!("SAVEPOINT {PROBE_SAVEPOINT}"))
                .map_err(query_error)?;
        }

        match client.prepare(sql) {
            Ok(stmt) => {
                if guarded {
                    client
                        .batch_execute(&format!("RELEASE SAVEPOINT {PROBE_SAVEPOINT}"))
                        .map_err(query_error)?;
                }
                Ok(stmt
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(i, c)| ColumnMeta::new(c.name(), i, Some(c.type_().name().to_string())))
                    .collect())
            }
            Err(e) => {
                if guarded {
                    client
                        .batch_execute(&format!("ROLLBACK TO SAVEPOINT {PROBE_SAVEPOINT}"))
                        .map_err(query_error)?;
                }
                Err(query_error(e))
            }
        }
    }

    fn has_rows(&mut self, sql: &str) -> Result<bool> {
        let messages = self.client()?.simple_query(sql).map_err(query_error)?;
        Ok(messages
            .iter()
            .any(|m| matches!(m, SimpleQueryMessage::Row(_))))
    }
}
