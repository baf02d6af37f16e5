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
use crate::models::BookInput;
use crate::services::catalog_service;

#[derive(Deserialize)]
pub struct ListBooksQuery {
    pub search: Option<String>,
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Value>, DomainError> {
    let books = catalog_service::list_books(&state.engine, query.search.as_deref()).await?;

    Ok(Json(json!({
        "total": books.len(),
        "books": books,
    })))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let book = catalog_service::get_book(&state.engine, &id).await?;
    Ok(Json(json!({ "book": book })))
}

pub async fn create_book(
    State(state): State<AppState>,
    AppJson(input): AppJson<BookInput>,
) -> Result<impl IntoResponse, DomainError> {
    let book = catalog_service::create_book(&state.engine, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Book created successfully",
            "book": book
        })),
    ))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<BookInput>,
) -> Result<Json<Value>, DomainError> {
    let book = catalog_service::update_book(&state.engine, &id, input).await?;

    Ok(Json(json!({
        "message": "Book updated successfully",
        "book": book
    })))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    catalog_service::delete_book(&state.engine, &id).await?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

/// Recompute availability of every book from the loan history
pub async fn reconcile_books(State(state): State<AppState>) -> Result<Json<Value>, DomainError> {
    let changed = state.engine.reconcile_availability().await?;

    Ok(Json(json!({
        "reconciled": changed.len(),
        "books": changed,
    })))
}
