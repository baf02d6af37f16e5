use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::extract::AppJson;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::{MemberInput, MemberUpdate};
use crate::services::member_service;

#[derive(Deserialize)]
pub struct ListMembersQuery {
    pub search: Option<String>,
}

pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListMembersQuery>,
) -> Result<Json<Value>, DomainError> {
    let members = member_service::list_members(&state.engine, query.search.as_deref()).await?;

    Ok(Json(json!({
        "total": members.len(),
        "members": members,
    })))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let member = member_service::get_member(&state.engine, &id).await?;
    Ok(Json(json!({ "member": member })))
}

pub async fn create_member(
    State(state): State<AppState>,
    AppJson(input): AppJson<MemberInput>,
) -> Result<impl IntoResponse, DomainError> {
    let member = member_service::register_member(&state.engine, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Member registered successfully",
            "member": member
        })),
    ))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<MemberUpdate>,
) -> Result<Json<Value>, DomainError> {
    let member = member_service::update_member(&state.engine, &id, update).await?;

    Ok(Json(json!({
        "message": "Member updated successfully",
        "member": member
    })))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    member_service::delete_member(&state.engine, &id).await?;
    Ok(Json(json!({ "message": "Member deleted successfully" })))
}
