pub mod books;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod extract;
pub mod health;
pub mod loan;
pub mod members;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Catalog
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/reconcile", post(books::reconcile_books))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Members
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Circulation
        .route("/loans", get(loan::list_loans).post(loan::create_loan))
        .route("/loans/:id/return", put(loan::return_loan))
        // Reports
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/export/:collection", get(export::export_csv))
        // Assistant
        .route("/chat", post(chat::chat_handler))
        .with_state(state)
}
