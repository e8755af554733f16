//! The "plan an adventure" form.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{resolve_current_user, ActivityEntry};
use crate::auth::{list_scope, Principal};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{
    Activity, ActivityType, Adventure, CreateActivityRequest, CreateAdventureRequest, Resort,
    ResortFilter,
};

/// Minutes given to every activity created from the form.
pub const DEFAULT_ACTIVITY_MINUTES: i64 = 120;

/// Days between the default start and end dates of a new plan.
const DEFAULT_TRIP_DAYS: i64 = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAdventureRequest {
    pub title: String,
    pub resort_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedAdventure {
    pub adventure: Adventure,
    pub activities: Vec<Activity>,
}

/// Initial state of the planning form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanForm {
    pub resorts: Vec<Resort>,
    pub selected_resort_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub activity_types: &'static [ActivityType],
}

/// Parse a form date: an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_plan_date(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::required(field));
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| AppError::Validation(format!("{} is not a valid date: {}", field, raw)))
}

fn default_dates(today: NaiveDate) -> (String, String) {
    let end = today + Duration::days(DEFAULT_TRIP_DAYS);
    (
        today.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    )
}

fn select_resort(resorts: &[Resort], preselected: Option<&str>) -> Option<String> {
    preselected
        .and_then(|id| resorts.iter().find(|resort| resort.id == id))
        .or_else(|| resorts.first())
        .map(|resort| resort.id.clone())
}

/// Defaults for a fresh planning form.
pub async fn plan_form(
    repo: &Repository,
    principal: &Principal,
    preselected: Option<&str>,
) -> Result<PlanForm, AppError> {
    let scope = list_scope::<Resort>(principal)?;
    let resorts = repo
        .list_resorts(&scope, &ResortFilter::default(), None)
        .await?;
    let selected_resort_id = select_resort(&resorts, preselected);
    let (start_date, end_date) = default_dates(Utc::now().date_naive());

    Ok(PlanForm {
        resorts,
        selected_resort_id,
        start_date,
        end_date,
        activity_types: ActivityType::ALL,
    })
}

/// Validate the form and write the adventure with its activities.
pub async fn plan_adventure(
    repo: &Repository,
    username: &str,
    request: &PlanAdventureRequest,
) -> Result<PlannedAdventure, AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::required("Title"));
    }
    if request.resort_id.trim().is_empty() {
        return Err(AppError::required("Resort"));
    }

    let start_date = parse_plan_date("Start date", &request.start_date)?;
    let end_date = parse_plan_date("End date", &request.end_date)?;
    if end_date < start_date {
        return Err(AppError::Validation(
            "End date must not be before the start date".to_string(),
        ));
    }

    let entries = request
        .activities
        .iter()
        .map(|raw| raw.parse::<ActivityEntry>())
        .collect::<Result<Vec<_>, _>>()?;

    if repo.get_resort(&request.resort_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Resort {} does not exist",
            request.resort_id
        )));
    }

    let user = resolve_current_user(repo, username).await?;

    let adventure = CreateAdventureRequest {
        title: title.to_string(),
        start_date,
        end_date,
        user_id: user.id,
        resort_id: request.resort_id.clone(),
    };
    let activities: Vec<CreateActivityRequest> = entries
        .into_iter()
        .map(|entry| CreateActivityRequest {
            name: entry.name,
            activity_type: Some(entry.activity_type),
            date: start_date,
            duration: Some(DEFAULT_ACTIVITY_MINUTES),
            adventure_id: String::new(),
        })
        .collect();

    let (adventure, activities) = repo
        .create_adventure_with_activities(username, &adventure, &activities)
        .await?;

    tracing::info!(
        adventure_id = %adventure.id,
        owner = %username,
        activities = activities.len(),
        "Planned adventure"
    );

    Ok(PlannedAdventure {
        adventure,
        activities,
    })
}
