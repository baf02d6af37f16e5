use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::domain::{Collection, DomainError};
use crate::infrastructure::AppState;
use crate::services::export_service;

/// Download a collection as a CSV attachment
pub async fn export_csv(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let collection: Collection = collection.parse()?;
    let csv = export_service::export_collection(&state.engine, collection).await?;

    let filename = export_service::export_filename(collection, chrono::Utc::now().date_naive());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| DomainError::InvalidInput(e.to_string()))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((StatusCode::OK, headers, csv))
}
