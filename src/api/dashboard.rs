use axum::{Json, extract::State};
use chrono::Utc;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::report_service::{self, Dashboard};

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, DomainError> {
    let dashboard = report_service::dashboard(&state.engine, Utc::now()).await?;
    Ok(Json(dashboard))
}
