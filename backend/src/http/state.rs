//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
///
/// Handlers only read through the repository; the handle itself is never
/// replaced after startup.
#[derive(Clone)]
pub struct AppState {
    /// Readings store selected at startup
    pub repository: Arc<dyn FullRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }
}
