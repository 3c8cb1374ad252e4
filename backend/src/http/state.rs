//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::session::SessionRegistry;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for data access
    pub repository: Arc<dyn FullRepository>,
    /// Signed-in users keyed by access token
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Create a new application state with the default session lifetime.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_sessions(repository, SessionRegistry::default())
    }

    pub fn with_sessions(repository: Arc<dyn FullRepository>, sessions: SessionRegistry) -> Self {
        Self {
            repository,
            sessions,
        }
    }
}
