use thiserror::Error;

#[derive(Debug, Error)]
pub enum SluiceError {
    /// Opening or using the database session failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed; carries the literal SQL that was attempted
    #[error("An error occurred executing the following sql:\n{sql}\nThe error was {reason}")]
    Execution { sql: String, reason: String },

    /// The backend lacks a capability the caller asked for
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Fetching a script from source control failed
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Begin, commit or rollback failed
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Error in a read or introspection query
    #[error("Query error: {0}")]
    Query(String),

    /// Malformed positional template
    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SluiceError {
    /// Wraps a driver failure with the statement that triggered it.
    pub fn execution(sql: impl Into<String>, reason: impl ToString) -> Self {
        Self::Execution {
            sql: sql.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;
