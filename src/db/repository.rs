//! Database repository shared state and query helpers.
//!
//! Per-model operations live in sibling modules as further `impl Repository`
//! blocks. Every list is ordered by insertion (`rowid`).

use std::sync::Arc;

use sqlx::{Encode, QueryBuilder, Row, Sqlite, SqlitePool, Type};
use tokio::sync::Mutex;

use crate::auth::Scope;
use crate::errors::AppError;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
    /// Serializes demo seeding so concurrent first listings seed once.
    pub(super) seed_lock: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            seed_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Cheap liveness probe used by the health endpoint.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Current version of a row, or 0 when it has disappeared.
    pub(super) async fn current_version(&self, table: &str, id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(&format!("SELECT version FROM {} WHERE id = ?", table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some(row) => row.try_get("version")?,
            None => 0,
        })
    }

    /// Delete a row by id, mapping "nothing deleted" to `NotFound`.
    pub(super) async fn delete_row(&self, table: &str, label: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} {} not found", label, id)));
        }
        Ok(())
    }
}

/// Start a `SELECT` over `table` restricted to the caller's scope.
pub(super) fn select_scoped<'a>(
    columns: &str,
    table: &str,
    scope: &'a Scope,
) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {} WHERE 1 = 1", columns, table));
    if let Some(owner) = scope.owner() {
        qb.push(" AND owner = ").push_bind(owner);
    }
    qb
}

/// Append `AND column = value` when a filter value is present.
pub(super) fn push_eq<'a, T>(qb: &mut QueryBuilder<'a, Sqlite>, column: &str, value: Option<T>)
where
    T: 'a + Encode<'a, Sqlite> + Type<Sqlite> + Send,
{
    if let Some(value) = value {
        qb.push(" AND ").push(column).push(" = ").push_bind(value);
    }
}

/// Append insertion ordering and the optional pass-through limit.
pub(super) fn finish_list(qb: &mut QueryBuilder<'_, Sqlite>, limit: Option<i64>) {
    qb.push(" ORDER BY rowid");
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
}

/// Fail with a conflict when the caller expected another version.
pub(super) fn check_version(
    label: &str,
    expected: Option<i64>,
    current: i64,
) -> Result<(), AppError> {
    match expected {
        Some(expected) if expected != current => Err(AppError::Conflict {
            message: format!(
                "{} version mismatch: expected {}, current {}",
                label, expected, current
            ),
            current_version: current,
        }),
        _ => Ok(()),
    }
}

pub(super) fn concurrent_modification(current_version: i64) -> AppError {
    AppError::Conflict {
        message: "Concurrent modification detected".to_string(),
        current_version,
    }
}

pub(super) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
