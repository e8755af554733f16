//! Activity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Model, Operation, Rule};

string_enum! {
    ActivityType {
        Ski => "SKI",
        Snowboard => "SNOWBOARD",
        Lesson => "LESSON",
        ApresSki => "APRES_SKI",
        Other => "OTHER",
    }
}

/// Something scheduled during an adventure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    pub date: DateTime<Utc>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub adventure_id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl Model for Activity {
    const NAME: &'static str = "activity";
    const RULES: &'static [Rule] = &[Rule::Owner(Operation::ALL)];

    fn owner(&self) -> &str {
        &self.owner
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub duration: Option<i64>,
    pub adventure_id: String,
}

impl CreateActivityRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_text("Activity name", &self.name)?;
        super::require_text("Adventure ID", &self.adventure_id)?;
        validate_duration(self.duration)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<i64>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateActivityRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_if_present("Activity name", self.name.as_ref())?;
        validate_duration(self.duration)
    }
}

fn validate_duration(duration: Option<i64>) -> Result<(), crate::errors::AppError> {
    match duration {
        Some(minutes) if minutes < 0 => Err(crate::errors::AppError::Validation(
            "Duration must not be negative".to_string(),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub adventure_id: Option<String>,
    pub activity_type: Option<ActivityType>,
}
