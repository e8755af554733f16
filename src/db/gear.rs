//! Gear persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{
    check_version, concurrent_modification, finish_list, new_id, push_eq, select_scoped,
};
use super::Repository;
use crate::auth::Scope;
use crate::errors::AppError;
use crate::models::{CreateGearRequest, Gear, GearFilter, UpdateGearRequest};

const GEAR_COLUMNS: &str =
    "id, name, gear_type, status, adventure_id, owner, created_at, updated_at, version";

impl Repository {
    pub async fn list_gear(
        &self,
        scope: &Scope,
        filter: &GearFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Gear>, AppError> {
        let mut qb = select_scoped(GEAR_COLUMNS, "gear", scope);
        push_eq(&mut qb, "adventure_id", filter.adventure_id.as_deref());
        push_eq(&mut qb, "gear_type", filter.gear_type);
        push_eq(&mut qb, "status", filter.status);
        finish_list(&mut qb, limit);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(gear_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn get_gear(&self, id: &str) -> Result<Option<Gear>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM gear WHERE id = ?", GEAR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(gear_from_row).transpose()?)
    }

    pub async fn create_gear(
        &self,
        owner: &str,
        request: &CreateGearRequest,
    ) -> Result<Gear, AppError> {
        let id = new_id();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO gear (id, name, gear_type, status, adventure_id, owner, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(request.gear_type)
        .bind(request.status)
        .bind(&request.adventure_id)
        .bind(owner)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Gear {
            id,
            name: request.name.clone(),
            gear_type: request.gear_type,
            status: request.status,
            adventure_id: request.adventure_id.clone(),
            owner: owner.to_string(),
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub async fn update_gear(
        &self,
        existing: &Gear,
        request: &UpdateGearRequest,
    ) -> Result<Gear, AppError> {
        check_version("Gear", request.expected_version, existing.version)?;

        let now = Utc::now();
        let updated = Gear {
            name: request.name.clone().unwrap_or_else(|| existing.name.clone()),
            gear_type: request.gear_type.or(existing.gear_type),
            status: request.status.or(existing.status),
            updated_at: now,
            version: existing.version + 1,
            ..existing.clone()
        };

        let result = sqlx::query(
            "UPDATE gear SET name = ?, gear_type = ?, status = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&updated.name)
        .bind(updated.gear_type)
        .bind(updated.status)
        .bind(now)
        .bind(updated.version)
        .bind(&existing.id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.current_version("gear", &existing.id).await?;
            return Err(concurrent_modification(current));
        }

        Ok(updated)
    }

    pub async fn delete_gear(&self, id: &str) -> Result<(), AppError> {
        self.delete_row("gear", "Gear", id).await
    }
}

fn gear_from_row(row: &SqliteRow) -> Result<Gear, sqlx::Error> {
    Ok(Gear {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        gear_type: row.try_get("gear_type")?,
        status: row.try_get("status")?,
        adventure_id: row.try_get("adventure_id")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
