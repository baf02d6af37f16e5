use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::extract::AppJson;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::LoanDto;
use crate::services::classify;
use crate::services::report_service::{self, LoanTab};

#[derive(Deserialize)]
pub struct ListLoansQuery {
    #[serde(default)]
    pub tab: LoanTab,
}

pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<Value>, DomainError> {
    let loans = report_service::list_loans(&state.engine, query.tab, Utc::now()).await?;

    Ok(Json(json!({
        "total": loans.len(),
        "loans": loans,
    })))
}

pub async fn create_loan(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoanDto>,
) -> Result<impl IntoResponse, DomainError> {
    let loan = state
        .engine
        .checkout(payload.book_id.trim(), payload.member_id.trim())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "state": classify(&loan, Utc::now()),
            "loan": loan,
            "message": "Loan created successfully"
        })),
    ))
}

pub async fn return_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let loan = state.engine.return_loan(&id).await?;

    Ok(Json(json!({
        "state": classify(&loan, Utc::now()),
        "loan": loan,
        "message": "Loan returned successfully"
    })))
}
