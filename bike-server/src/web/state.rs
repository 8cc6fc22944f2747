//! Application state for the web layer.

use std::sync::Arc;

use crate::repository::StationRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station repository shared with the background refresher
    pub repository: Arc<StationRepository>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(repository: Arc<StationRepository>) -> Self {
        Self { repository }
    }
}
