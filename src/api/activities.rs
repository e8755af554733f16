//! Activity API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{check_limit, found, parse_filter, success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{authorize_create, authorize_record, list_scope, Operation, Principal};
use crate::models::{Activity, ActivityFilter, CreateActivityRequest, UpdateActivityRequest};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub adventure_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_activities(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> ApiResult<Vec<Activity>> {
    let scope = list_scope::<Activity>(&principal)?;
    let limit = check_limit(query.limit)?;
    let filter = ActivityFilter {
        activity_type: parse_filter(query.activity_type.as_deref())?,
        adventure_id: query.adventure_id,
    };

    let activities = state.repo.list_activities(&scope, &filter, limit).await?;
    success(activities)
}

pub async fn get_activity(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<Activity> {
    let activity = found(state.repo.get_activity(&id).await?, "Activity", &id)?;
    authorize_record(&principal, Operation::Read, &activity)?;
    success(activity)
}

pub async fn create_activity(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<CreateActivityRequest>,
) -> ApiResult<Activity> {
    let owner = authorize_create::<Activity>(&principal)?;
    request.validate()?;

    let activity = state.repo.create_activity(owner, &request).await?;
    success(activity)
}

pub async fn update_activity(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateActivityRequest>,
) -> ApiResult<Activity> {
    let existing = found(state.repo.get_activity(&id).await?, "Activity", &id)?;
    authorize_record(&principal, Operation::Update, &existing)?;
    request.validate()?;

    let activity = state.repo.update_activity(&existing, &request).await?;
    success(activity)
}

pub async fn delete_activity(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = found(state.repo.get_activity(&id).await?, "Activity", &id)?;
    authorize_record(&principal, Operation::Delete, &existing)?;

    state.repo.delete_activity(&id).await?;
    success(())
}
