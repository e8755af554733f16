//! User persistence, including the username upsert behind current-user
//! resolution.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{
    check_version, concurrent_modification, finish_list, new_id, push_eq, select_scoped,
};
use super::Repository;
use crate::auth::Scope;
use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserFilter};

const USER_COLUMNS: &str = "id, username, email, profile_picture, skill_level, owner, \
    created_at, updated_at, version";

const INSERT_USER: &str = "INSERT INTO users (id, username, email, profile_picture, skill_level, owner, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1)";

impl Repository {
    pub async fn list_users(
        &self,
        scope: &Scope,
        filter: &UserFilter,
        limit: Option<i64>,
    ) -> Result<Vec<User>, AppError> {
        let mut qb = select_scoped(USER_COLUMNS, "users", scope);
        push_eq(&mut qb, "username", filter.username.as_deref());
        push_eq(&mut qb, "email", filter.email.as_deref());
        push_eq(&mut qb, "skill_level", filter.skill_level);
        finish_list(&mut qb, limit);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(user_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ? LIMIT 1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    /// Create a new user. A duplicate username is a constraint violation.
    pub async fn create_user(
        &self,
        owner: &str,
        request: &CreateUserRequest,
    ) -> Result<User, AppError> {
        let id = new_id();
        let now = Utc::now();

        sqlx::query(INSERT_USER)
            .bind(&id)
            .bind(&request.username)
            .bind(&request.email)
            .bind(&request.profile_picture)
            .bind(request.skill_level)
            .bind(owner)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(User {
            id,
            username: request.username.clone(),
            email: request.email.clone(),
            profile_picture: request.profile_picture.clone(),
            skill_level: request.skill_level,
            owner: owner.to_string(),
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    /// Return the user with `request.username`, inserting `request` on a miss.
    ///
    /// The insert and the unique `username` column make this safe under
    /// concurrent calls: exactly one row exists afterwards. The flag reports
    /// whether this call created it.
    pub async fn find_or_create_user(
        &self,
        owner: &str,
        request: &CreateUserRequest,
    ) -> Result<(User, bool), AppError> {
        let now = Utc::now();
        let result = sqlx::query(&format!("{} ON CONFLICT(username) DO NOTHING", INSERT_USER))
            .bind(new_id())
            .bind(&request.username)
            .bind(&request.email)
            .bind(&request.profile_picture)
            .bind(request.skill_level)
            .bind(owner)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        let user = self
            .find_user_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("User {} vanished after upsert", request.username))
            })?;

        Ok((user, result.rows_affected() > 0))
    }

    /// Update a user.
    ///
    /// With `expected_version` the write only applies to that version. Without
    /// it the write lands on whatever is stored: last write wins.
    pub async fn update_user(
        &self,
        existing: &User,
        request: &UpdateUserRequest,
    ) -> Result<User, AppError> {
        check_version("User", request.expected_version, existing.version)?;

        let now = Utc::now();
        let mut updated = User {
            id: existing.id.clone(),
            username: request
                .username
                .clone()
                .unwrap_or_else(|| existing.username.clone()),
            email: request.email.clone().unwrap_or_else(|| existing.email.clone()),
            profile_picture: request
                .profile_picture
                .clone()
                .or_else(|| existing.profile_picture.clone()),
            skill_level: request.skill_level.or(existing.skill_level),
            owner: existing.owner.clone(),
            created_at: existing.created_at,
            updated_at: now,
            version: existing.version + 1,
        };

        let sql = if request.expected_version.is_some() {
            "UPDATE users SET username = ?, email = ?, profile_picture = ?, skill_level = ?, updated_at = ?, version = version + 1 WHERE id = ? AND version = ?"
        } else {
            "UPDATE users SET username = ?, email = ?, profile_picture = ?, skill_level = ?, updated_at = ?, version = version + 1 WHERE id = ?"
        };

        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(sql)
            .bind(&updated.username)
            .bind(&updated.email)
            .bind(&updated.profile_picture)
            .bind(updated.skill_level)
            .bind(now)
            .bind(&existing.id);
        if request.expected_version.is_some() {
            query = query.bind(existing.version);
        }
        let result = query.execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            drop(tx);
            if request.expected_version.is_none() {
                return Err(AppError::NotFound(format!("User {} not found", existing.id)));
            }
            let current = self.current_version("users", &existing.id).await?;
            return Err(concurrent_modification(current));
        }

        // Unversioned writes may skip past several versions.
        updated.version = sqlx::query("SELECT version FROM users WHERE id = ?")
            .bind(&existing.id)
            .fetch_one(&mut *tx)
            .await?
            .try_get("version")?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a user. Fails while adventures still reference it.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        self.delete_row("users", "User", id).await
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        profile_picture: row.try_get("profile_picture")?,
        skill_level: row.try_get("skill_level")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
