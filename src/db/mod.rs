//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all planner data. The repository is the
//! "generated client": per-model list/get/create/update/delete.

mod activities;
mod adventures;
mod gear;
mod participants;
mod repository;
mod resorts;
mod users;

pub use adventures::AdventureRow;
pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations. Every statement is idempotent.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resorts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT NOT NULL,
            description TEXT,
            elevation INTEGER,
            number_of_trails INTEGER,
            difficulty TEXT,
            image_url TEXT,
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            -- find-or-create upserts on this constraint
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            profile_picture TEXT,
            skill_level TEXT,
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adventures (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id),
            resort_id TEXT NOT NULL REFERENCES resorts(id),
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            activity_type TEXT,
            date TEXT NOT NULL,
            duration INTEGER,
            adventure_id TEXT NOT NULL REFERENCES adventures(id) ON DELETE CASCADE,
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            adventure_id TEXT NOT NULL REFERENCES adventures(id) ON DELETE CASCADE,
            status TEXT,
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gear (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            gear_type TEXT,
            status TEXT,
            adventure_id TEXT NOT NULL REFERENCES adventures(id) ON DELETE CASCADE,
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One statement per query.
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_resorts_difficulty ON resorts(difficulty)",
        "CREATE INDEX IF NOT EXISTS idx_adventures_user_id ON adventures(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_adventures_resort_id ON adventures(resort_id)",
        "CREATE INDEX IF NOT EXISTS idx_adventures_owner ON adventures(owner)",
        "CREATE INDEX IF NOT EXISTS idx_activities_adventure_id ON activities(adventure_id)",
        "CREATE INDEX IF NOT EXISTS idx_participants_adventure_id ON participants(adventure_id)",
        "CREATE INDEX IF NOT EXISTS idx_participants_user_id ON participants(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_gear_adventure_id ON gear(adventure_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
