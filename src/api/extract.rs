use axum::extract::FromRequest;

use crate::domain::DomainError;

/// `Json` whose rejections surface as `DomainError::InvalidInput`, so a
/// malformed body gets the same 400 `{"error","kind"}` shape as any other
/// validation failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(DomainError))]
pub struct AppJson<T>(pub T);
