//! Information-schema style existence queries.
//!
//! Names are turned into SQL string literals, so every name passes through
//! [`escape_literal`] exactly once when the query is constructed.

use crate::dialect::Dialect;

/// Kind of schema object an existence query probes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Schema,
    Table,
    Column,
    Constraint,
    Index,
}

/// Doubles every single quote. `None` and empty input become an empty string.
pub fn escape_literal(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.replace('\'', "''"),
        _ => String::new(),
    }
}

/// A pure description of an existence probe: the object kind plus its escaped,
/// ordered name path (schema first, then table, then the member name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceQuery {
    kind: ObjectKind,
    names: Vec<String>,
}

impl ExistenceQuery {
    fn new(kind: ObjectKind, names: &[Option<&str>]) -> Self {
        Self {
            kind,
            names: names.iter().map(|n| escape_literal(*n)).collect(),
        }
    }

    pub fn schema(schema: &str) -> Self {
        Self::new(ObjectKind::Schema, &[Some(schema)])
    }

    pub fn table(schema: Option<&str>, table: &str) -> Self {
        Self::new(ObjectKind::Table, &[schema, Some(table)])
    }

    pub fn column(schema: Option<&str>, table: &str, column: &str) -> Self {
        Self::new(ObjectKind::Column, &[schema, Some(table), Some(column)])
    }

    pub fn constraint(schema: Option<&str>, table: &str, constraint: &str) -> Self {
        Self::new(ObjectKind::Constraint, &[schema, Some(table), Some(constraint)])
    }

    pub fn index(schema: Option<&str>, table: &str, index: &str) -> Self {
        Self::new(ObjectKind::Index, &[schema, Some(table), Some(index)])
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The escaped names, in schema/table/member order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn name(&self, idx: usize) -> &str {
        self.names.get(idx).map(String::as_str).unwrap_or_default()
    }

    fn schema_or_default(&self, dialect: Dialect) -> &str {
        match self.name(0) {
            "" => dialect.default_schema(),
            schema => schema,
        }
    }

    /// Renders the probe for `dialect`. The query yields a row iff the object exists.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::SQLite => self.sqlite_sql(),
            Dialect::PostgreSQL => self.postgres_sql(),
        }
    }

    // SQLite has a single schema per connection, so the schema name is not
    // part of any probe.
    fn sqlite_sql(&self) -> String {
        let table = self.name(1);
        match self.kind {
            ObjectKind::Schema => format!(
                "SELECT 1 FROM pragma_database_list WHERE name = '{}'",
                self.name(0)
            ),
            ObjectKind::Table => format!(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '{table}' COLLATE NOCASE"
            ),
            ObjectKind::Column => format!(
                "SELECT 1 FROM pragma_table_info('{table}') WHERE name = '{}' COLLATE NOCASE",
                self.name(2)
            ),
            // Named constraints are only recorded in the table's DDL text, which
            // is matched upper-cased with tabs and line breaks folded to spaces.
            ObjectKind::Constraint => {
                let name = format!("upper('{}')", self.name(2));
                format!(
                    "SELECT 1 FROM (SELECT replace(replace(replace(upper(sql), char(9), ' '), \
                     char(10), ' '), char(13), ' ') AS ddl FROM sqlite_master \
                     WHERE type = 'table' AND name = '{table}' COLLATE NOCASE) \
                     WHERE instr(ddl, 'CONSTRAINT ' || {name} || ' ') > 0 \
                     OR instr(ddl, 'CONSTRAINT ' || {name} || '(') > 0 \
                     OR instr(ddl, 'CONSTRAINT \"' || {name} || '\"') > 0 \
                     OR instr(ddl, 'CONSTRAINT `' || {name} || '`') > 0 \
                     OR instr(ddl, 'CONSTRAINT [' || {name} || ']') > 0"
                )
            }
            ObjectKind::Index => format!(
                "SELECT 1 FROM sqlite_master WHERE type = 'index' \
                 AND tbl_name = '{table}' COLLATE NOCASE AND name = '{}' COLLATE NOCASE",
                self.name(2)
            ),
        }
    }

    fn postgres_sql(&self) -> String {
        let schema = self.schema_or_default(Dialect::PostgreSQL);
        let table = self.name(1);
        match self.kind {
            ObjectKind::Schema => format!(
                "SELECT 1 FROM information_schema.schemata WHERE schema_name = '{}'",
                self.name(0)
            ),
            ObjectKind::Table => format!(
                "SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = '{schema}' AND table_name = '{table}'"
            ),
            ObjectKind::Column => format!(
                "SELECT 1 FROM information_schema.columns \
                 WHERE table_schema = '{schema}' AND table_name = '{table}' AND column_name = '{}'",
                self.name(2)
            ),
            ObjectKind::Constraint => format!(
                "SELECT 1 FROM information_schema.table_constraints \
                 WHERE constraint_schema = '{schema}' AND table_name = '{table}' AND constraint_name = '{}'",
                self.name(2)
            ),
            ObjectKind::Index => format!(
                "SELECT 1 FROM pg_catalog.pg_indexes \
                 WHERE schemaname = '{schema}' AND tablename = '{table}' AND indexname = '{}'",
                self.name(2)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_doubles_each_quote_and_nothing_else() {
        let name = "o'neil's 'table'";
        let escaped = escape_literal(Some(name));
        assert_eq!(escaped, "o''neil''s ''table''");
        assert_eq!(
            escaped.matches('\'').count(),
            2 * name.matches('\'').count()
        );
        assert_eq!(escaped.replace("''", "'"), name);
    }

    #[test]
    fn null_and_empty_names_escape_to_empty() {
        assert_eq!(escape_literal(None), "");
        assert_eq!(escape_literal(Some("")), "");
    }

    #[test]
    fn names_are_escaped_once_at_construction() {
        let query = ExistenceQuery::column(None, "it's", "o'k");
        assert_eq!(query.kind(), ObjectKind::Column);
        assert_eq!(query.names(), ["", "it''s", "o''k"]);

        let sql = query.to_sql(Dialect::SQLite);
        assert!(sql.contains("pragma_table_info('it''s')"));
        assert!(sql.contains("name = 'o''k' COLLATE NOCASE"));
        assert!(!sql.contains("''''"));
    }

    #[test]
    fn postgres_defaults_to_public_schema() {
        let sql = ExistenceQuery::table(None, "users").to_sql(Dialect::PostgreSQL);
        assert!(sql.contains("table_schema = 'public'"));
        assert!(sql.contains("table_name = 'users'"));

        let sql = ExistenceQuery::table(Some("audit"), "users").to_sql(Dialect::PostgreSQL);
        assert!(sql.contains("table_schema = 'audit'"));
    }

    #[test]
    fn sqlite_index_probe_is_scoped_to_table() {
        let sql = ExistenceQuery::index(None, "posts", "idx_posts_author").to_sql(Dialect::SQLite);
        assert_eq!(
            sql,
            "SELECT 1 FROM sqlite_master WHERE type = 'index' \
             AND tbl_name = 'posts' COLLATE NOCASE AND name = 'idx_posts_author' COLLATE NOCASE"
        );
    }

    #[test]
    fn postgres_constraint_probe_uses_table_constraints() {
        let sql = ExistenceQuery::constraint(Some("app"), "users", "pk_users")
            .to_sql(Dialect::PostgreSQL);
        assert!(sql.starts_with("SELECT 1 FROM information_schema.table_constraints"));
        assert!(sql.contains("constraint_schema = 'app'"));
        assert!(sql.contains("constraint_name = 'pk_users'"));
    }

    #[test]
    fn sqlite_constraint_probe_normalizes_the_ddl() {
        let sql = ExistenceQuery::constraint(None, "Orders", "ck_total").to_sql(Dialect::SQLite);
        assert!(sql.contains("upper(sql)"));
        assert!(sql.contains("char(9)") && sql.contains("char(10)") && sql.contains("char(13)"));
        assert!(sql.contains("name = 'Orders' COLLATE NOCASE"));
        assert!(sql.contains("'CONSTRAINT ' || upper('ck_total') || ' '"));
        assert!(sql.contains("'CONSTRAINT ' || upper('ck_total') || '('"));
    }
}
