//! SQL dialects and the per-backend capability flags that drive execution quirks.

use core::fmt;

/// SQL dialect spoken by a session backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    SQLite,
    PostgreSQL,
}

impl Dialect {
    /// Name of the schema unqualified objects live in.
    pub const fn default_schema(self) -> &'static str {
        match self {
            Dialect::SQLite => "main",
            Dialect::PostgreSQL => "public",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::SQLite => f.write_str("sqlite"),
            Dialect::PostgreSQL => f.write_str("postgresql"),
        }
    }
}

/// What a backend adapter can and cannot do.
///
/// These flags belong to the adapter, never to statement content: the runner
/// consults them to decide how a statement is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub dialect: Dialect,
    /// Whether objects can be qualified by a schema other than the default one.
    pub supports_schemas: bool,
    /// Whether a finite per-statement command timeout is honored. When `false`
    /// statements always run with the timeout disabled.
    pub honors_command_timeout: bool,
    /// Whether multi-row data inserts must be issued as one statement per row.
    pub insert_rows_separately: bool,
}

impl Capabilities {
    pub const fn sqlite() -> Self {
        Self {
            dialect: Dialect::SQLite,
            supports_schemas: false,
            honors_command_timeout: false,
            insert_rows_separately: false,
        }
    }

    pub const fn postgres() -> Self {
        Self {
            dialect: Dialect::PostgreSQL,
            supports_schemas: true,
            honors_command_timeout: true,
            insert_rows_separately: false,
        }
    }

    pub const fn with_insert_rows_separately(mut self, separately: bool) -> Self {
        self.insert_rows_separately = separately;
        self
    }

    #[inline]
    pub const fn default_schema(&self) -> &'static str {
        self.dialect.default_schema()
    }
}
