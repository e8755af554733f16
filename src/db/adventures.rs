//! Adventure persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::activities::insert_activity;
use super::repository::{
    check_version, concurrent_modification, finish_list, new_id, push_eq, select_scoped,
};
use super::Repository;
use crate::auth::Scope;
use crate::errors::AppError;
use crate::models::{
    Activity, Adventure, AdventureFilter, CreateActivityRequest, CreateAdventureRequest,
    UpdateAdventureRequest,
};

const ADVENTURE_COLUMNS: &str =
    "id, title, start_date, end_date, user_id, resort_id, owner, created_at, updated_at, version";

/// An adventure joined with the figures the "my adventures" view shows.
#[derive(Debug, Clone)]
pub struct AdventureRow {
    pub adventure: Adventure,
    pub resort_name: Option<String>,
    pub activity_count: i64,
}

impl Repository {
    pub async fn list_adventures(
        &self,
        scope: &Scope,
        filter: &AdventureFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Adventure>, AppError> {
        let mut qb = select_scoped(ADVENTURE_COLUMNS, "adventures", scope);
        push_eq(&mut qb, "user_id", filter.user_id.as_deref());
        push_eq(&mut qb, "resort_id", filter.resort_id.as_deref());
        push_eq(&mut qb, "title", filter.title.as_deref());
        finish_list(&mut qb, limit);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(adventure_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Adventures planned by `user_id`, with resort name and activity count.
    pub async fn list_adventure_rows_for_user(
        &self,
        owner: &str,
        user_id: &str,
    ) -> Result<Vec<AdventureRow>, AppError> {
        let rows = sqlx::query(
            r#"SELECT a.id AS id, a.title AS title, a.start_date AS start_date,
                      a.end_date AS end_date, a.user_id AS user_id, a.resort_id AS resort_id,
                      a.owner AS owner, a.created_at AS created_at,
                      a.updated_at AS updated_at, a.version AS version,
                      r.name AS resort_name,
                      (SELECT COUNT(*) FROM activities act WHERE act.adventure_id = a.id)
                          AS activity_count
               FROM adventures a
               LEFT JOIN resorts r ON r.id = a.resort_id
               WHERE a.owner = ? AND a.user_id = ?
               ORDER BY a.rowid"#,
        )
        .bind(owner)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<AdventureRow, AppError> {
                Ok(AdventureRow {
                    adventure: adventure_from_row(row)?,
                    resort_name: row.try_get("resort_name")?,
                    activity_count: row.try_get("activity_count")?,
                })
            })
            .collect()
    }

    pub async fn get_adventure(&self, id: &str) -> Result<Option<Adventure>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM adventures WHERE id = ?",
            ADVENTURE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(adventure_from_row).transpose()?)
    }

    pub async fn create_adventure(
        &self,
        owner: &str,
        request: &CreateAdventureRequest,
    ) -> Result<Adventure, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(insert_adventure(&mut conn, owner, request).await?)
    }

    /// Create an adventure and its activities in one transaction.
    ///
    /// Each entry of `activities` has its `adventure_id` replaced by the new
    /// adventure's id. Either everything is written or nothing is.
    pub async fn create_adventure_with_activities(
        &self,
        owner: &str,
        request: &CreateAdventureRequest,
        activities: &[CreateActivityRequest],
    ) -> Result<(Adventure, Vec<Activity>), AppError> {
        let mut tx = self.pool.begin().await?;

        let adventure = insert_adventure(&mut tx, owner, request).await?;
        let mut created = Vec::with_capacity(activities.len());
        for activity in activities {
            let activity = CreateActivityRequest {
                adventure_id: adventure.id.clone(),
                ..activity.clone()
            };
            created.push(insert_activity(&mut tx, owner, &activity).await?);
        }

        tx.commit().await?;
        Ok((adventure, created))
    }

    /// Update an adventure with optimistic concurrency control.
    pub async fn update_adventure(
        &self,
        existing: &Adventure,
        request: &UpdateAdventureRequest,
    ) -> Result<Adventure, AppError> {
        check_version("Adventure", request.expected_version, existing.version)?;

        let now = Utc::now();
        let updated = Adventure {
            id: existing.id.clone(),
            title: request.title.clone().unwrap_or_else(|| existing.title.clone()),
            start_date: request.start_date.unwrap_or(existing.start_date),
            end_date: request.end_date.unwrap_or(existing.end_date),
            user_id: existing.user_id.clone(),
            resort_id: request
                .resort_id
                .clone()
                .unwrap_or_else(|| existing.resort_id.clone()),
            owner: existing.owner.clone(),
            created_at: existing.created_at,
            updated_at: now,
            version: existing.version + 1,
        };

        let result = sqlx::query(
            "UPDATE adventures SET title = ?, start_date = ?, end_date = ?, resort_id = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&updated.title)
        .bind(updated.start_date)
        .bind(updated.end_date)
        .bind(&updated.resort_id)
        .bind(now)
        .bind(updated.version)
        .bind(&existing.id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.current_version("adventures", &existing.id).await?;
            return Err(concurrent_modification(current));
        }

        Ok(updated)
    }

    /// Delete an adventure together with its activities, participants and gear.
    pub async fn delete_adventure(&self, id: &str) -> Result<(), AppError> {
        self.delete_row("adventures", "Adventure", id).await
    }
}

async fn insert_adventure(
    conn: &mut SqliteConnection,
    owner: &str,
    request: &CreateAdventureRequest,
) -> Result<Adventure, sqlx::Error> {
    let id = new_id();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO adventures (id, title, start_date, end_date, user_id, resort_id, owner, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
    )
    .bind(&id)
    .bind(&request.title)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(&request.user_id)
    .bind(&request.resort_id)
    .bind(owner)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Adventure {
        id,
        title: request.title.clone(),
        start_date: request.start_date,
        end_date: request.end_date,
        user_id: request.user_id.clone(),
        resort_id: request.resort_id.clone(),
        owner: owner.to_string(),
        created_at: now,
        updated_at: now,
        version: 1,
    })
}

fn adventure_from_row(row: &SqliteRow) -> Result<Adventure, sqlx::Error> {
    Ok(Adventure {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        user_id: row.try_get("user_id")?,
        resort_id: row.try_get("resort_id")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
