//! Gear API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{check_limit, found, parse_filter, success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{authorize_create, authorize_record, list_scope, Operation, Principal};
use crate::models::{CreateGearRequest, Gear, GearFilter, UpdateGearRequest};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearQuery {
    pub adventure_id: Option<String>,
    #[serde(rename = "type")]
    pub gear_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_gear(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<GearQuery>,
) -> ApiResult<Vec<Gear>> {
    let scope = list_scope::<Gear>(&principal)?;
    let limit = check_limit(query.limit)?;
    let filter = GearFilter {
        gear_type: parse_filter(query.gear_type.as_deref())?,
        status: parse_filter(query.status.as_deref())?,
        adventure_id: query.adventure_id,
    };

    let gear = state.repo.list_gear(&scope, &filter, limit).await?;
    success(gear)
}

pub async fn get_gear(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<Gear> {
    let gear = found(state.repo.get_gear(&id).await?, "Gear", &id)?;
    authorize_record(&principal, Operation::Read, &gear)?;
    success(gear)
}

pub async fn create_gear(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<CreateGearRequest>,
) -> ApiResult<Gear> {
    let owner = authorize_create::<Gear>(&principal)?;
    request.validate()?;

    let gear = state.repo.create_gear(owner, &request).await?;
    success(gear)
}

pub async fn update_gear(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateGearRequest>,
) -> ApiResult<Gear> {
    let existing = found(state.repo.get_gear(&id).await?, "Gear", &id)?;
    authorize_record(&principal, Operation::Update, &existing)?;
    request.validate()?;

    let gear = state.repo.update_gear(&existing, &request).await?;
    success(gear)
}

pub async fn delete_gear(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = found(state.repo.get_gear(&id).await?, "Gear", &id)?;
    authorize_record(&principal, Operation::Delete, &existing)?;

    state.repo.delete_gear(&id).await?;
    success(())
}
