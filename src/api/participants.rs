//! Participant API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{check_limit, found, parse_filter, success, ApiJson, ApiQuery, ApiResult};
use crate::auth::{authorize_create, authorize_record, list_scope, Operation, Principal};
use crate::models::{
    CreateParticipantRequest, Participant, ParticipantFilter, UpdateParticipantRequest,
};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantQuery {
    pub adventure_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_participants(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<ParticipantQuery>,
) -> ApiResult<Vec<Participant>> {
    let scope = list_scope::<Participant>(&principal)?;
    let limit = check_limit(query.limit)?;
    let filter = ParticipantFilter {
        status: parse_filter(query.status.as_deref())?,
        adventure_id: query.adventure_id,
        user_id: query.user_id,
    };

    let participants = state.repo.list_participants(&scope, &filter, limit).await?;
    success(participants)
}

pub async fn get_participant(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<Participant> {
    let participant = found(state.repo.get_participant(&id).await?, "Participant", &id)?;
    authorize_record(&principal, Operation::Read, &participant)?;
    success(participant)
}

pub async fn create_participant(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<CreateParticipantRequest>,
) -> ApiResult<Participant> {
    let owner = authorize_create::<Participant>(&principal)?;
    request.validate()?;

    let participant = state.repo.create_participant(owner, &request).await?;
    success(participant)
}

pub async fn update_participant(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateParticipantRequest>,
) -> ApiResult<Participant> {
    let existing = found(state.repo.get_participant(&id).await?, "Participant", &id)?;
    authorize_record(&principal, Operation::Update, &existing)?;

    let participant = state.repo.update_participant(&existing, &request).await?;
    success(participant)
}

pub async fn delete_participant(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = found(state.repo.get_participant(&id).await?, "Participant", &id)?;
    authorize_record(&principal, Operation::Delete, &existing)?;

    state.repo.delete_participant(&id).await?;
    success(())
}
