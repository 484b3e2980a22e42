//! SQLite session adapters.

#[cfg(feature = "rusqlite")]
pub mod rusqlite;
