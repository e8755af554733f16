//! Adventure API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{check_limit, found, success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{authorize_create, authorize_record, list_scope, Operation, Principal};
use crate::models::{Adventure, AdventureFilter, CreateAdventureRequest, UpdateAdventureRequest};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureQuery {
    pub user_id: Option<String>,
    pub resort_id: Option<String>,
    pub title: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/adventures
pub async fn list_adventures(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<AdventureQuery>,
) -> ApiResult<Vec<Adventure>> {
    let scope = list_scope::<Adventure>(&principal)?;
    let limit = check_limit(query.limit)?;
    let filter = AdventureFilter {
        user_id: query.user_id,
        resort_id: query.resort_id,
        title: query.title,
    };

    let adventures = state.repo.list_adventures(&scope, &filter, limit).await?;
    success(adventures)
}

/// GET /api/adventures/{id}
pub async fn get_adventure(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<Adventure> {
    let adventure = found(state.repo.get_adventure(&id).await?, "Adventure", &id)?;
    authorize_record(&principal, Operation::Read, &adventure)?;
    success(adventure)
}

/// POST /api/adventures - Create an adventure without activities.
pub async fn create_adventure(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<CreateAdventureRequest>,
) -> ApiResult<Adventure> {
    let owner = authorize_create::<Adventure>(&principal)?;
    request.validate()?;

    let adventure = state.repo.create_adventure(owner, &request).await?;
    success(adventure)
}

/// PUT /api/adventures/{id}
pub async fn update_adventure(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateAdventureRequest>,
) -> ApiResult<Adventure> {
    let existing = found(state.repo.get_adventure(&id).await?, "Adventure", &id)?;
    authorize_record(&principal, Operation::Update, &existing)?;
    request.validate()?;

    let adventure = state.repo.update_adventure(&existing, &request).await?;
    success(adventure)
}

/// DELETE /api/adventures/{id} - Also removes its activities, participants and gear.
pub async fn delete_adventure(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = found(state.repo.get_adventure(&id).await?, "Adventure", &id)?;
    authorize_record(&principal, Operation::Delete, &existing)?;

    state.repo.delete_adventure(&id).await?;
    success(())
}
