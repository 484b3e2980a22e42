//! Materialized query results.

use core::fmt;

/// A single cell read back from the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Column metadata taken from a result shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub ordinal: usize,
    /// Declared or reported type name, when the backend exposes one.
    pub declared_type: Option<String>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, ordinal: usize, declared_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            ordinal,
            declared_type,
        }
    }
}

/// Every row and column of a query, fully drained from the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<ColumnMeta>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Cell at `row` for the column called `column`.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// Outcome of a best-effort metadata probe.
///
/// The probe never fails: anything that goes wrong, including a missing
/// table, is reported as [`TableSchema::NotAvailable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSchema {
    Found(Vec<ColumnMeta>),
    NotAvailable,
}

impl TableSchema {
    pub fn columns(&self) -> &[ColumnMeta] {
        match self {
            TableSchema::Found(columns) => columns,
            TableSchema::NotAvailable => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TableSchema::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_column_name_is_case_insensitive() {
        let table = DataTable::new(
            vec![ColumnMeta::new("id", 0, None), ColumnMeta::new("Name", 1, None)],
            vec![vec![Value::Integer(1), Value::Text("ada".into())]],
        );
        assert_eq!(table.get(0, "name"), Some(&Value::Text("ada".into())));
        assert_eq!(table.get(0, "ID"), Some(&Value::Integer(1)));
        assert_eq!(table.get(1, "id"), None);
    }

    #[test]
    fn unavailable_schema_has_no_columns() {
        assert!(TableSchema::NotAvailable.columns().is_empty());
        assert!(!TableSchema::NotAvailable.is_available());
    }
}
