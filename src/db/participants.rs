//! Participant persistence.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{
    check_version, concurrent_modification, finish_list, new_id, push_eq, select_scoped,
};
use super::Repository;
use crate::auth::Scope;
use crate::errors::AppError;
use crate::models::{
    CreateParticipantRequest, Participant, ParticipantFilter, UpdateParticipantRequest,
};

const PARTICIPANT_COLUMNS: &str =
    "id, user_id, adventure_id, status, owner, created_at, updated_at, version";

impl Repository {
    pub async fn list_participants(
        &self,
        scope: &Scope,
        filter: &ParticipantFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Participant>, AppError> {
        let mut qb = select_scoped(PARTICIPANT_COLUMNS, "participants", scope);
        push_eq(&mut qb, "adventure_id", filter.adventure_id.as_deref());
        push_eq(&mut qb, "user_id", filter.user_id.as_deref());
        push_eq(&mut qb, "status", filter.status);
        finish_list(&mut qb, limit);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(participant_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn get_participant(&self, id: &str) -> Result<Option<Participant>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM participants WHERE id = ?",
            PARTICIPANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(participant_from_row).transpose()?)
    }

    pub async fn create_participant(
        &self,
        owner: &str,
        request: &CreateParticipantRequest,
    ) -> Result<Participant, AppError> {
        let id = new_id();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO participants (id, user_id, adventure_id, status, owner, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.user_id)
        .bind(&request.adventure_id)
        .bind(request.status)
        .bind(owner)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Participant {
            id,
            user_id: request.user_id.clone(),
            adventure_id: request.adventure_id.clone(),
            status: request.status,
            owner: owner.to_string(),
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub async fn update_participant(
        &self,
        existing: &Participant,
        request: &UpdateParticipantRequest,
    ) -> Result<Participant, AppError> {
        check_version("Participant", request.expected_version, existing.version)?;

        let now = Utc::now();
        let updated = Participant {
            status: request.status.or(existing.status),
            updated_at: now,
            version: existing.version + 1,
            ..existing.clone()
        };

        let result = sqlx::query(
            "UPDATE participants SET status = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(updated.status)
        .bind(now)
        .bind(updated.version)
        .bind(&existing.id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.current_version("participants", &existing.id).await?;
            return Err(concurrent_modification(current));
        }

        Ok(updated)
    }

    pub async fn delete_participant(&self, id: &str) -> Result<(), AppError> {
        self.delete_row("participants", "Participant", id).await
    }
}

fn participant_from_row(row: &SqliteRow) -> Result<Participant, sqlx::Error> {
    Ok(Participant {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        adventure_id: row.try_get("adventure_id")?,
        status: row.try_get("status")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
