//! Domain layer - Pure business abstractions
//!
//! Only the store contract and domain error types live here.

pub mod errors;
pub mod repositories;

pub use errors::{DomainError, DomainResult};
pub use repositories::*;
