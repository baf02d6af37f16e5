//! Services Layer
//!
//! Business logic, independent of the HTTP handlers that call it.

pub mod catalog_service;
pub mod export_service;
pub mod loan_service;
pub mod member_service;
pub mod report_service;
pub mod validation;

// Re-export for convenience
pub use loan_service::{
    CRITICAL_LATENESS_DAYS, CirculationEngine, classify, is_critical, lateness_days,
    outstanding_loans,
};
