//! Participant model linking users to adventures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Model, Operation, Rule};

string_enum! {
    ParticipantStatus {
        Invited => "INVITED",
        Confirmed => "CONFIRMED",
        Declined => "DECLINED",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub user_id: String,
    pub adventure_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ParticipantStatus>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl Model for Participant {
    const NAME: &'static str = "participant";
    const RULES: &'static [Rule] = &[Rule::Owner(Operation::ALL)];

    fn owner(&self) -> &str {
        &self.owner
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    pub user_id: String,
    pub adventure_id: String,
    #[serde(default)]
    pub status: Option<ParticipantStatus>,
}

impl CreateParticipantRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_text("User ID", &self.user_id)?;
        super::require_text("Adventure ID", &self.adventure_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParticipantRequest {
    #[serde(default)]
    pub status: Option<ParticipantStatus>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ParticipantFilter {
    pub adventure_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<ParticipantStatus>,
}
