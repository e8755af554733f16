//! User API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{check_limit, found, parse_filter, success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{authorize_create, authorize_record, list_scope, Operation, Principal};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserFilter};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub username: Option<String>,
    pub email: Option<String>,
    pub skill_level: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/users - List the caller's user records.
pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Vec<User>> {
    let scope = list_scope::<User>(&principal)?;
    let limit = check_limit(query.limit)?;
    let filter = UserFilter {
        skill_level: parse_filter(query.skill_level.as_deref())?,
        username: query.username,
        email: query.email,
    };

    let users = state.repo.list_users(&scope, &filter, limit).await?;
    success(users)
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let user = found(state.repo.get_user(&id).await?, "User", &id)?;
    authorize_record(&principal, Operation::Read, &user)?;
    success(user)
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<User> {
    let owner = authorize_create::<User>(&principal)?;
    request.validate()?;
    check_username(owner, &request.username)?;

    let user = state.repo.create_user(owner, &request).await?;
    success(user)
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<User> {
    let existing = found(state.repo.get_user(&id).await?, "User", &id)?;
    authorize_record(&principal, Operation::Update, &existing)?;
    request.validate()?;
    if let Some(username) = &request.username {
        check_username(&existing.owner, username)?;
    }

    let user = state.repo.update_user(&existing, &request).await?;
    success(user)
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = found(state.repo.get_user(&id).await?, "User", &id)?;
    authorize_record(&principal, Operation::Delete, &existing)?;

    state.repo.delete_user(&id).await?;
    success(())
}

/// A user record always carries its owner's username.
fn check_username(owner: &str, username: &str) -> Result<(), AppError> {
    if username != owner {
        return Err(AppError::Forbidden(format!(
            "Username {:?} does not match the signed-in user",
            username
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_username() {
        assert!(check_username("bob", "bob").is_ok());
        assert!(matches!(
            check_username("mallory", "bob"),
            Err(AppError::Forbidden(_))
        ));
    }
}
