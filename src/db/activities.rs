//! Activity persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::repository::{
    check_version, concurrent_modification, finish_list, new_id, push_eq, select_scoped,
};
use super::Repository;
use crate::auth::Scope;
use crate::errors::AppError;
use crate::models::{Activity, ActivityFilter, CreateActivityRequest, UpdateActivityRequest};

const ACTIVITY_COLUMNS: &str = "id, name, activity_type, date, duration, adventure_id, owner, \
    created_at, updated_at, version";

impl Repository {
    pub async fn list_activities(
        &self,
        scope: &Scope,
        filter: &ActivityFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Activity>, AppError> {
        let mut qb = select_scoped(ACTIVITY_COLUMNS, "activities", scope);
        push_eq(&mut qb, "adventure_id", filter.adventure_id.as_deref());
        push_eq(&mut qb, "activity_type", filter.activity_type);
        finish_list(&mut qb, limit);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(activity_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn get_activity(&self, id: &str) -> Result<Option<Activity>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM activities WHERE id = ?",
            ACTIVITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(activity_from_row).transpose()?)
    }

    pub async fn create_activity(
        &self,
        owner: &str,
        request: &CreateActivityRequest,
    ) -> Result<Activity, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(insert_activity(&mut conn, owner, request).await?)
    }

    pub async fn update_activity(
        &self,
        existing: &Activity,
        request: &UpdateActivityRequest,
    ) -> Result<Activity, AppError> {
        check_version("Activity", request.expected_version, existing.version)?;

        let now = Utc::now();
        let updated = Activity {
            id: existing.id.clone(),
            name: request.name.clone().unwrap_or_else(|| existing.name.clone()),
            activity_type: request.activity_type.or(existing.activity_type),
            date: request.date.unwrap_or(existing.date),
            duration: request.duration.or(existing.duration),
            adventure_id: existing.adventure_id.clone(),
            owner: existing.owner.clone(),
            created_at: existing.created_at,
            updated_at: now,
            version: existing.version + 1,
        };

        let result = sqlx::query(
            "UPDATE activities SET name = ?, activity_type = ?, date = ?, duration = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&updated.name)
        .bind(updated.activity_type)
        .bind(updated.date)
        .bind(updated.duration)
        .bind(now)
        .bind(updated.version)
        .bind(&existing.id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.current_version("activities", &existing.id).await?;
            return Err(concurrent_modification(current));
        }

        Ok(updated)
    }

    pub async fn delete_activity(&self, id: &str) -> Result<(), AppError> {
        self.delete_row("activities", "Activity", id).await
    }
}

pub(super) async fn insert_activity(
    conn: &mut SqliteConnection,
    owner: &str,
    request: &CreateActivityRequest,
) -> Result<Activity, sqlx::Error> {
    let id = new_id();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO activities (id, name, activity_type, date, duration, adventure_id, owner, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
    )
    .bind(&id)
    .bind(&request.name)
    .bind(request.activity_type)
    .bind(request.date)
    .bind(request.duration)
    .bind(&request.adventure_id)
    .bind(owner)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Activity {
        id,
        name: request.name.clone(),
        activity_type: request.activity_type,
        date: request.date,
        duration: request.duration,
        adventure_id: request.adventure_id.clone(),
        owner: owner.to_string(),
        created_at: now,
        updated_at: now,
        version: 1,
    })
}

fn activity_from_row(row: &SqliteRow) -> Result<Activity, sqlx::Error> {
    Ok(Activity {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        activity_type: row.try_get("activity_type")?,
        date: row.try_get("date")?,
        duration: row.try_get("duration")?,
        adventure_id: row.try_get("adventure_id")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
