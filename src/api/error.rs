use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::OutOfStock(_)
            | DomainError::AlreadyReturned(_)
            | DomainError::DuplicateMemberId(_) => StatusCode::CONFLICT,
            DomainError::InvalidEmail(_) | DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind for clients
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::OutOfStock(_) => "out_of_stock",
            DomainError::AlreadyReturned(_) => "already_returned",
            DomainError::DuplicateMemberId(_) => "duplicate_member_id",
            DomainError::InvalidEmail(_) => "invalid_email",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::Storage(_) => "storage",
        }
    }
}

impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        DomainError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error.message = %self, "Unexpected error happened");
        }

        (
            status,
            Json(json!({
                "error": self.to_string(),
                "kind": self.kind(),
            })),
        )
            .into_response()
    }
}
