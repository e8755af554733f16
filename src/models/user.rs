//! User profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Model, Operation, Rule};

string_enum! {
    /// Self-reported skiing ability.
    SkillLevel {
        Beginner => "BEGINNER",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
        Expert => "EXPERT",
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        SkillLevel::Intermediate
    }
}

/// A planner profile, one per identity-provider username.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl Model for User {
    const NAME: &'static str = "user";
    const RULES: &'static [Rule] = &[Rule::Owner(Operation::ALL)];

    fn owner(&self) -> &str {
        &self.owner
    }
}

/// Request body for creating a new user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_text("Username", &self.username)?;
        super::require_text("Email", &self.email)
    }
}

/// Request body for updating an existing user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_if_present("Username", self.username.as_ref())?;
        super::require_if_present("Email", self.email.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub skill_level: Option<SkillLevel>,
}
