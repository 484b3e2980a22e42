//! Audit sink that sees every statement before it is attempted.

/// Receives the SQL text of every execution attempt, previews included.
pub trait SqlSink {
    fn report(&self, sql: &str);
}

impl<F> SqlSink for F
where
    F: Fn(&str),
{
    fn report(&self, sql: &str) {
        self(sql)
    }
}

/// Default sink: one info-level tracing event per statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SqlSink for TracingSink {
    fn report(&self, sql: &str) {
        #[cfg(feature = "tracing")]
        ::tracing::info!(sql = %sql, "sluice.sql");
        #[cfg(not(feature = "tracing"))]
        let _ = sql;
    }
}
