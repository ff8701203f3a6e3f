use std::sync::Arc;

use crate::advisory::pipeline::TravelAdviser;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable adviser. Production: `AdvisoryPipeline`. Tests swap in stubs.
    pub adviser: Arc<dyn TravelAdviser>,
}
