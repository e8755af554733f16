//! Endpoints backing the planner pages.

use axum::extract::State;
use serde::Deserialize;

use super::{success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{CurrentUser, Principal};
use crate::models::User;
use crate::planner::{
    self, AdventureSummary, PlanAdventureRequest, PlanForm, PlannedAdventure, ProfileUpdate,
};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFormQuery {
    pub resort_id: Option<String>,
}

/// GET /api/me - The caller's profile, created on first visit.
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
) -> ApiResult<User> {
    success(planner::load_profile(&state.repo, &username).await?)
}

/// PUT /api/me
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<User> {
    success(planner::update_profile(&state.repo, &username, &update).await?)
}

/// POST /api/me/avatar
pub async fn regenerate_avatar(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
) -> ApiResult<User> {
    success(planner::regenerate_avatar(&state.repo, &username).await?)
}

/// GET /api/my-adventures
pub async fn my_adventures(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
) -> ApiResult<Vec<AdventureSummary>> {
    success(planner::my_adventures(&state.repo, &username).await?)
}

/// GET /api/plan?resortId= - Defaults for the planning form.
pub async fn get_plan_form(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<PlanFormQuery>,
) -> ApiResult<PlanForm> {
    let form = planner::plan_form(&state.repo, &principal, query.resort_id.as_deref()).await?;
    success(form)
}

/// POST /api/plan - Create an adventure and its activities in one go.
pub async fn plan_adventure(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    ApiJson(request): ApiJson<PlanAdventureRequest>,
) -> ApiResult<PlannedAdventure> {
    success(planner::plan_adventure(&state.repo, &username, &request).await?)
}
