//! PostgreSQL session adapters.

#[cfg(feature = "postgres-sync")]
pub mod postgres_sync;
