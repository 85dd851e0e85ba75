//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `ragchat-core` on the `kv_store` table. Every
//! row belongs to a scope (the profile name), so two profiles sharing one
//! database file never see each other's entries.

use chrono::Utc;
use ragchat_core::storage::kv_store::{KvOp, KvStore};
use ragchat_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`, bound to one scope.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: DatabasePool,
    scope: String,
}

impl SqliteKvStore {
    pub fn new(pool: DatabasePool, scope: impl Into<String>) -> Self {
        Self {
            pool,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

const UPSERT: &str = r#"INSERT INTO kv_store (scope, key, value, created_at, updated_at)
   VALUES (?, ?, ?, ?, ?)
   ON CONFLICT (scope, key) DO UPDATE
   SET value = excluded.value, updated_at = excluded.updated_at"#;

const DELETE: &str = "DELETE FROM kv_store WHERE scope = ? AND key = ?";

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE scope = ? AND key = ?")
            .bind(&self.scope)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(UPSERT)
            .bind(&self.scope)
            .bind(key)
            .bind(value)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query(DELETE)
            .bind(&self.scope)
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT key FROM kv_store WHERE scope = ? ORDER BY key")
            .bind(&self.scope)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("key"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn commit(&self, ops: Vec<KvOp>) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        for op in &ops {
            match op {
                KvOp::Set { key, value } => {
                    sqlx::query(UPSERT)
                        .bind(&self.scope)
                        .bind(key)
                        .bind(value)
                        .bind(&now)
                        .bind(&now)
                        .execute(&mut *tx)
                        .await
                        .map_err(map_sqlx_error)?;
                }
                KvOp::Delete { key } => {
                    sqlx::query(DELETE)
                        .bind(&self.scope)
                        .bind(key)
                        .execute(&mut *tx)
                        .await
                        .map_err(map_sqlx_error)?;
                }
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        tracing::debug!(scope = %self.scope, ops = ops.len(), "Committed kv batch");
        Ok(())
    }
}
