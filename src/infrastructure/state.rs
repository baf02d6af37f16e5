//! Application state shared across all handlers

use std::sync::Arc;

use crate::genie::LibrarianAssistant;
use crate::services::CirculationEngine;

#[derive(Clone)]
pub struct AppState {
    /// Single writer of the entity store
    pub engine: Arc<CirculationEngine>,
    pub assistant: Arc<dyn LibrarianAssistant>,
}

impl AppState {
    pub fn new(engine: CirculationEngine, assistant: Arc<dyn LibrarianAssistant>) -> Self {
        Self {
            engine: Arc::new(engine),
            assistant,
        }
    }
}
