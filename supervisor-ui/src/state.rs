//! Shared application state for the HTTP server.

use supervisor::Supervisor;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one supervision engine this process serves.
    pub supervisor: Supervisor,
}

impl AppState {
    pub fn new(supervisor: Supervisor) -> Self {
        Self { supervisor }
    }
}
