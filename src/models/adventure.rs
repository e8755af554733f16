//! Adventure (planned trip) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Model, Operation, Rule};

/// A dated ski trip planned by one user at one resort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adventure {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user_id: String,
    pub resort_id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,
}

impl Adventure {
    /// Trip length in whole days, rounded up. Never negative.
    pub fn days(&self) -> i64 {
        let seconds = (self.end_date - self.start_date).num_seconds().max(0);
        (seconds + 86_399) / 86_400
    }
}

impl Model for Adventure {
    const NAME: &'static str = "adventure";
    const RULES: &'static [Rule] = &[Rule::Owner(Operation::ALL)];

    fn owner(&self) -> &str {
        &self.owner
    }
}

/// Request body for creating a new adventure.
///
/// `end_date >= start_date` is not checked here. Only the planning workflow
/// enforces it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdventureRequest {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user_id: String,
    pub resort_id: String,
}

impl CreateAdventureRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_text("Title", &self.title)?;
        super::require_text("User ID", &self.user_id)?;
        super::require_text("Resort ID", &self.resort_id)
    }
}

/// Request body for updating an existing adventure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdventureRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resort_id: Option<String>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateAdventureRequest {
    pub fn validate(&self) -> Result<(), crate::errors::AppError> {
        super::require_if_present("Title", self.title.as_ref())?;
        super::require_if_present("Resort ID", self.resort_id.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdventureFilter {
    pub user_id: Option<String>,
    pub resort_id: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn trip(hours: i64) -> Adventure {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        Adventure {
            id: "a".into(),
            title: "Trip".into(),
            start_date: start,
            end_date: start + Duration::hours(hours),
            user_id: "u".into(),
            resort_id: "r".into(),
            owner: "alice".into(),
            created_at: start,
            updated_at: start,
            version: 1,
        }
    }

    #[test]
    fn test_days_rounds_up() {
        assert_eq!(trip(0).days(), 0);
        assert_eq!(trip(1).days(), 1);
        assert_eq!(trip(24 * 5).days(), 5);
        assert_eq!(trip(24 * 5 + 1).days(), 6);
    }

    #[test]
    fn test_days_never_negative() {
        assert_eq!(trip(-48).days(), 0);
    }
}
