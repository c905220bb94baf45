//! # SQLite Key-Value Repository
//!
//! `DurableKv` over the `kv_store` table.
//!
//! ## Table
//! ```text
//! ┌──────────────────────────┬──────────────────────────────┬─────────────┐
//! │ key (PK)                 │ value                        │ updated_at  │
//! ├──────────────────────────┼──────────────────────────────┼─────────────┤
//! │ @GoMarketPlace:products  │ [{"id":"p-1",...}]           │ 2026-...Z   │
//! └──────────────────────────┴──────────────────────────────┴─────────────┘
//! ```
//!
//! `set` is a single upsert statement, so a crash mid-write leaves either
//! the old or the new value, never a mix.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::DurableKv;
use crate::error::DbResult;

/// Repository for key-value operations.
#[derive(Debug, Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    /// Creates a new SqliteKv on an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteKv { pool }
    }
}

#[async_trait]
impl DurableKv for SqliteKv {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "kv set");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "kv remove");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
