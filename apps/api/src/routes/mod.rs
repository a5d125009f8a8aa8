pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::personalization::handlers as personalization;
use crate::roadmaps::handlers as roadmaps;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/roadmap/personalized",
            post(personalization::handle_personalized_roadmap),
        )
        .route("/api/v1/roadmaps/:career", get(roadmaps::handle_get_canonical))
        .route(
            "/api/v1/careers/resolve",
            get(roadmaps::handle_resolve_career),
        )
        .with_state(state)
}
