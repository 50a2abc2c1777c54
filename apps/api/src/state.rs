use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    /// Advisory cache of entity ids discovered during resolution.
    /// Never authoritative: resolution re-probes on a miss or stale hit.
    pub session: Arc<dyn SessionStore>,
    pub config: Config,
}
