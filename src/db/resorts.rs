//! Resort persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::repository::{
    check_version, concurrent_modification, finish_list, new_id, push_eq, select_scoped,
};
use super::Repository;
use crate::auth::Scope;
use crate::errors::AppError;
use crate::models::{CreateResortRequest, Resort, ResortFilter, UpdateResortRequest};

const RESORT_COLUMNS: &str = "id, name, location, description, elevation, number_of_trails, \
    difficulty, image_url, owner, created_at, updated_at, version";

impl Repository {
    /// List resorts matching every supplied filter.
    pub async fn list_resorts(
        &self,
        scope: &Scope,
        filter: &ResortFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Resort>, AppError> {
        let mut qb = select_scoped(RESORT_COLUMNS, "resorts", scope);
        push_eq(&mut qb, "name", filter.name.as_deref());
        push_eq(&mut qb, "location", filter.location.as_deref());
        push_eq(&mut qb, "difficulty", filter.difficulty);
        finish_list(&mut qb, limit);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(resort_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Get a resort by ID.
    pub async fn get_resort(&self, id: &str) -> Result<Option<Resort>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM resorts WHERE id = ?", RESORT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(resort_from_row).transpose()?)
    }

    /// Create a new resort owned by `owner`.
    pub async fn create_resort(
        &self,
        owner: &str,
        request: &CreateResortRequest,
    ) -> Result<Resort, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(insert_resort(&mut conn, owner, request).await?)
    }

    /// Insert the demo resorts when the table is empty.
    ///
    /// Returns how many resorts were inserted: either all of `seeds` or none.
    pub async fn seed_resorts_if_empty(
        &self,
        owner: &str,
        seeds: &[CreateResortRequest],
    ) -> Result<usize, AppError> {
        let _guard = self.seed_lock.lock().await;

        let mut tx = self.pool.begin().await?;
        let existing: i64 = sqlx::query("SELECT COUNT(*) AS count FROM resorts")
            .fetch_one(&mut *tx)
            .await?
            .try_get("count")?;
        if existing > 0 {
            return Ok(0);
        }

        for seed in seeds {
            insert_resort(&mut tx, owner, seed).await?;
        }
        tx.commit().await?;

        Ok(seeds.len())
    }

    /// Update a resort with optimistic concurrency control.
    pub async fn update_resort(
        &self,
        existing: &Resort,
        request: &UpdateResortRequest,
    ) -> Result<Resort, AppError> {
        check_version("Resort", request.expected_version, existing.version)?;

        let now = Utc::now();
        let updated = Resort {
            id: existing.id.clone(),
            name: request.name.clone().unwrap_or_else(|| existing.name.clone()),
            location: request
                .location
                .clone()
                .unwrap_or_else(|| existing.location.clone()),
            description: request
                .description
                .clone()
                .or_else(|| existing.description.clone()),
            elevation: request.elevation.or(existing.elevation),
            number_of_trails: request.number_of_trails.or(existing.number_of_trails),
            difficulty: request.difficulty.or(existing.difficulty),
            image_url: request.image_url.clone().or_else(|| existing.image_url.clone()),
            owner: existing.owner.clone(),
            created_at: existing.created_at,
            updated_at: now,
            version: existing.version + 1,
        };

        let result = sqlx::query(
            "UPDATE resorts SET name = ?, location = ?, description = ?, elevation = ?, number_of_trails = ?, difficulty = ?, image_url = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&updated.name)
        .bind(&updated.location)
        .bind(&updated.description)
        .bind(updated.elevation)
        .bind(updated.number_of_trails)
        .bind(updated.difficulty)
        .bind(updated.image_url.as_deref())
        .bind(now)
        .bind(updated.version)
        .bind(&existing.id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.current_version("resorts", &existing.id).await?;
            return Err(concurrent_modification(current));
        }

        Ok(updated)
    }

    /// Delete a resort. Fails while adventures still reference it.
    pub async fn delete_resort(&self, id: &str) -> Result<(), AppError> {
        self.delete_row("resorts", "Resort", id).await
    }
}

async fn insert_resort(
    conn: &mut SqliteConnection,
    owner: &str,
    request: &CreateResortRequest,
) -> Result<Resort, sqlx::Error> {
    let id = new_id();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO resorts (id, name, location, description, elevation, number_of_trails, difficulty, image_url, owner, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
    )
    .bind(&id)
    .bind(&request.name)
    .bind(&request.location)
    .bind(&request.description)
    .bind(request.elevation)
    .bind(request.number_of_trails)
    .bind(request.difficulty)
    .bind(&request.image_url)
    .bind(owner)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Resort {
        id,
        name: request.name.clone(),
        location: request.location.clone(),
        description: request.description.clone(),
        elevation: request.elevation,
        number_of_trails: request.number_of_trails,
        difficulty: request.difficulty,
        image_url: request.image_url.clone(),
        owner: owner.to_string(),
        created_at: now,
        updated_at: now,
        version: 1,
    })
}

fn resort_from_row(row: &SqliteRow) -> Result<Resort, sqlx::Error> {
    Ok(Resort {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        description: row.try_get("description")?,
        elevation: row.try_get("elevation")?,
        number_of_trails: row.try_get("number_of_trails")?,
        difficulty: row.try_get("difficulty")?,
        image_url: row.try_get("image_url")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
