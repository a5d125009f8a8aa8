//! Axum route handlers for canonical roadmaps.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Roadmap;
use crate::roadmaps::career::map_career_to_job_file;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub input: String,
    pub job_file: &'static str,
}

/// GET /api/v1/careers/resolve?name=
pub async fn handle_resolve_career(
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, AppError> {
    let input = query.name.trim();
    if input.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    Ok(Json(ResolveResponse {
        input: input.to_string(),
        job_file: map_career_to_job_file(input),
    }))
}

/// GET /api/v1/roadmaps/:career
///
/// The canonical, unannotated roadmap a career label maps to.
pub async fn handle_get_canonical(
    State(state): State<AppState>,
    Path(career): Path<String>,
) -> Result<Json<Roadmap>, AppError> {
    let job_file = map_career_to_job_file(&career);
    Ok(Json(state.roadmaps.load(job_file).await?))
}
