//! Librarian assistant: free-text questions in, free-text answers out

pub mod models;
pub mod service;

pub use service::{GeminiLibrarian, LibrarianAssistant};
