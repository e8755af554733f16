//! The "my adventures" overview.

use chrono::{Duration, Utc};
use serde::Serialize;

use super::resolve_current_user;
use crate::auth::Scope;
use crate::db::{AdventureRow, Repository};
use crate::errors::AppError;
use crate::models::{Adventure, CreateAdventureRequest, ResortFilter};

pub const SAMPLE_TRIP_TITLE: &str = "My First Ski Trip";
const SAMPLE_TRIP_LEAD_DAYS: i64 = 30;
const SAMPLE_TRIP_DAYS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureSummary {
    #[serde(flatten)]
    pub adventure: Adventure,
    pub resort_name: Option<String>,
    pub activity_count: i64,
    pub days: i64,
}

impl From<AdventureRow> for AdventureSummary {
    fn from(row: AdventureRow) -> Self {
        Self {
            days: row.adventure.days(),
            adventure: row.adventure,
            resort_name: row.resort_name,
            activity_count: row.activity_count,
        }
    }
}

/// The caller's adventures. A first-time visitor gets a sample trip at the
/// first resort, when there is one.
pub async fn my_adventures(
    repo: &Repository,
    username: &str,
) -> Result<Vec<AdventureSummary>, AppError> {
    let user = resolve_current_user(repo, username).await?;
    let mut rows = repo.list_adventure_rows_for_user(username, &user.id).await?;

    if rows.is_empty() {
        let first_resort = repo
            .list_resorts(&Scope::Everyone, &ResortFilter::default(), Some(1))
            .await?
            .into_iter()
            .next();

        if let Some(resort) = first_resort {
            let start_date = Utc::now() + Duration::days(SAMPLE_TRIP_LEAD_DAYS);
            let sample = CreateAdventureRequest {
                title: SAMPLE_TRIP_TITLE.to_string(),
                start_date,
                end_date: start_date + Duration::days(SAMPLE_TRIP_DAYS),
                user_id: user.id.clone(),
                resort_id: resort.id,
            };
            let adventure = repo.create_adventure(username, &sample).await?;
            tracing::info!(adventure_id = %adventure.id, owner = %username, "Created sample adventure");

            rows = repo.list_adventure_rows_for_user(username, &user.id).await?;
        }
    }

    Ok(rows.into_iter().map(AdventureSummary::from).collect())
}
