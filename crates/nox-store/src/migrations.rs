//! # Storage Migrations
//!
//! Embedded SQL migrations for the local storage database.
//!
//! ## How Migrations Work
//! ```text
//! Open storage
//!      │
//!      ▼
//! _sqlx_migrations table exists? ── no ──► create it
//!      │
//!      ▼
//! 001_local_storage.sql  applied? ── no ──► run in a transaction, record checksum
//!      │
//!      ▼
//! Storage ready
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. Use `IF NOT EXISTS` where possible
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::{SqliteStorage, StorageConfig};
    use crate::storage::LocalStorage;

    #[test]
    fn test_migrations_are_embedded() {
        assert_eq!(MIGRATOR.migrations.len(), 1);
        assert_eq!(MIGRATOR.migrations[0].version, 1);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let storage = SqliteStorage::open(StorageConfig::in_memory()).await.unwrap();
        storage.set_item("nox-customer-info", "{}").await.unwrap();

        storage.run_migrations().await.unwrap();
        assert_eq!(
            storage.get_item("nox-customer-info").await.unwrap().as_deref(),
            Some("{}")
        );
    }
}
