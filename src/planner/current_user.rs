use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{CreateUserRequest, SkillLevel, User};

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/personas/svg";

/// Generated avatar image for `seed`.
pub fn avatar_url(seed: &str) -> String {
    format!("{}?seed={}", AVATAR_BASE_URL, seed)
}

/// Return the user record for `username`, creating a default one on first use.
pub async fn resolve_current_user(repo: &Repository, username: &str) -> Result<User, AppError> {
    find_or_create(repo, username, None).await
}

/// Like [`resolve_current_user`], but a newly created record gets an avatar.
pub async fn resolve_profile_user(repo: &Repository, username: &str) -> Result<User, AppError> {
    find_or_create(repo, username, Some(avatar_url(username))).await
}

async fn find_or_create(
    repo: &Repository,
    username: &str,
    profile_picture: Option<String>,
) -> Result<User, AppError> {
    let request = default_profile(username, profile_picture);
    request.validate()?;

    let (user, created) = repo.find_or_create_user(username, &request).await?;
    if created {
        tracing::info!(username = %username, user_id = %user.id, "Created user profile");
    }
    if user.owner != username {
        tracing::warn!(username = %username, owner = %user.owner, "Username held by another owner");
        return Err(AppError::Forbidden(format!(
            "Username {:?} belongs to another user",
            username
        )));
    }
    Ok(user)
}

fn default_profile(username: &str, profile_picture: Option<String>) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: username.to_string(),
        profile_picture,
        skill_level: Some(SkillLevel::default()),
    }
}
