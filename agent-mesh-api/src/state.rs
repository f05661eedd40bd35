use agent_mesh_core::Platform;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<Platform>,
}

impl AppState {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform: Arc::new(platform),
        }
    }
}
