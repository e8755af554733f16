//! Gear checklist model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Model, Operation, Rule};

string_enum! {
    GearType {
        Ski => "SKI",
        Snowboard => "SNOWBOARD",
        Helmet => "HELMET",
        Goggles => "GOGGLES",
        Clothing => "CLOTHING",
        Other => "OTHER",
    }
}

string_enum! {
    GearStatus {
        Owned => "OWNED",
        NeedToBuy => "NEED_TO_BUY",
        NeedToRent => "NEED_TO_RENT",
    }
}

/// An item on an adventure's packing list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gear {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub gear_type: Option<GearType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GearStatus>,
    pub adventure_id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl Model for Gear {
    const NAME: &'static str = "gear";
    const RULES: &'static [Rule] = &[Rule::Owner(Operation::ALL)];

    fn owner(&self) -> &str {
        &self.owner
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGearRequest {
    pub name: String,
    #[serde(rename = "type", default)]
    pub gear_type: Option<GearType>,
    #[serde(default)]
    pub status: Option<GearStatus>,
    pub adventure_id: String,
}

impl CreateGearRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_text("Gear name", &self.name)?;
        super::require_text("Adventure ID", &self.adventure_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGearRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub gear_type: Option<GearType>,
    #[serde(default)]
    pub status: Option<GearStatus>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateGearRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_if_present("Gear name", self.name.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GearFilter {
    pub adventure_id: Option<String>,
    pub gear_type: Option<GearType>,
    pub status: Option<GearStatus>,
}
