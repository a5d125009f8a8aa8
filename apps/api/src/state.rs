use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::profile::store::ProfileStore;
use crate::roadmaps::loader::RoadmapLoader;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every collaborator sits behind a trait object so handlers can be exercised
/// without a database or a live generation service.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub roadmaps: Arc<dyn RoadmapLoader>,
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
