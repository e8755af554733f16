//! Resort API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{check_limit, found, success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{authorize_create, authorize_record, Operation, Principal};
use crate::models::{CreateResortRequest, Resort, ResortFilter, UpdateResortRequest};
use crate::planner::{self, DifficultyFilter};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortQuery {
    pub name: Option<String>,
    pub location: Option<String>,
    /// `ALL` or a difficulty
    pub difficulty: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/resorts - List resorts, seeding the demo catalogue on first use.
pub async fn list_resorts(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<ResortQuery>,
) -> ApiResult<Vec<Resort>> {
    let limit = check_limit(query.limit)?;
    let difficulty = match query.difficulty.as_deref() {
        Some(raw) => raw.parse::<DifficultyFilter>()?,
        None => DifficultyFilter::All,
    };
    let filter = ResortFilter {
        name: query.name,
        location: query.location,
        difficulty: difficulty.difficulty(),
    };

    let resorts =
        planner::list_resorts(&state.repo, &state.config, &principal, filter, limit).await?;
    success(resorts)
}

/// GET /api/resorts/{id} - Get a single resort.
pub async fn get_resort(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<Resort> {
    let resort = found(state.repo.get_resort(&id).await?, "Resort", &id)?;
    authorize_record(&principal, Operation::Read, &resort)?;
    success(resort)
}

/// POST /api/resorts - Create a new resort.
pub async fn create_resort(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<CreateResortRequest>,
) -> ApiResult<Resort> {
    let owner = authorize_create::<Resort>(&principal)?;
    request.validate()?;

    let resort = state.repo.create_resort(owner, &request).await?;
    success(resort)
}

/// PUT /api/resorts/{id} - Update a resort.
pub async fn update_resort(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateResortRequest>,
) -> ApiResult<Resort> {
    let existing = found(state.repo.get_resort(&id).await?, "Resort", &id)?;
    authorize_record(&principal, Operation::Update, &existing)?;
    request.validate()?;

    let resort = state.repo.update_resort(&existing, &request).await?;
    success(resort)
}

/// DELETE /api/resorts/{id} - Delete a resort.
pub async fn delete_resort(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = found(state.repo.get_resort(&id).await?, "Resort", &id)?;
    authorize_record(&principal, Operation::Delete, &existing)?;

    state.repo.delete_resort(&id).await?;
    success(())
}
