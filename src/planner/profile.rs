use chrono::Utc;
use serde::Deserialize;

use super::{avatar_url, resolve_profile_user};
use crate::auth::{authorize_record, Operation, Principal};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{SkillLevel, UpdateUserRequest, User};

/// Fields the profile page can change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// The signed-in user's profile. A missing picture falls back to the
/// generated avatar.
pub async fn load_profile(repo: &Repository, username: &str) -> Result<User, AppError> {
    let mut user = resolve_profile_user(repo, username).await?;
    if user.profile_picture.is_none() {
        user.profile_picture = Some(avatar_url(&user.username));
    }
    Ok(user)
}

/// Save profile changes. Last write wins: no version token is sent.
pub async fn update_profile(
    repo: &Repository,
    username: &str,
    update: &ProfileUpdate,
) -> Result<User, AppError> {
    let request = UpdateUserRequest {
        skill_level: update.skill_level,
        profile_picture: update.profile_picture.clone(),
        ..Default::default()
    };
    save(repo, username, &request).await
}

/// Replace the avatar with a freshly seeded one.
pub async fn regenerate_avatar(repo: &Repository, username: &str) -> Result<User, AppError> {
    let seed = format!("{}-{}", username, Utc::now().timestamp_millis());
    let request = UpdateUserRequest {
        profile_picture: Some(avatar_url(&seed)),
        ..Default::default()
    };
    save(repo, username, &request).await
}

async fn save(
    repo: &Repository,
    username: &str,
    request: &UpdateUserRequest,
) -> Result<User, AppError> {
    request.validate()?;
    let user = resolve_profile_user(repo, username).await?;
    authorize_record(&Principal::User(username.to_string()), Operation::Update, &user)?;
    let updated = repo.update_user(&user, request).await?;
    tracing::debug!(user_id = %updated.id, version = updated.version, "Updated profile");
    Ok(updated)
}
