//! Resort model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Model, Operation, Rule};

string_enum! {
    /// Overall difficulty of a resort's terrain.
    Difficulty {
        Beginner => "BEGINNER",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
        Expert => "EXPERT",
    }
}

/// A ski resort. Readable by everyone, including guests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resort {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Summit elevation in metres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_trails: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl Model for Resort {
    const NAME: &'static str = "resort";
    const RULES: &'static [Rule] = &[
        Rule::Guest(&[Operation::Read]),
        Rule::Owner(Operation::ALL),
    ];

    fn owner(&self) -> &str {
        &self.owner
    }
}

/// Request body for creating a new resort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResortRequest {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub elevation: Option<i64>,
    #[serde(default)]
    pub number_of_trails: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreateResortRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_text("Resort name", &self.name)?;
        super::require_text("Resort location", &self.location)
    }
}

/// Request body for updating an existing resort.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResortRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub elevation: Option<i64>,
    #[serde(default)]
    pub number_of_trails: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateResortRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_if_present("Resort name", self.name.as_ref())?;
        super::require_if_present("Resort location", self.location.as_ref())
    }
}

/// Equality filters accepted by resort listings.
#[derive(Debug, Clone, Default)]
pub struct ResortFilter {
    pub name: Option<String>,
    pub location: Option<String>,
    pub difficulty: Option<Difficulty>,
}
