//! Axum route handlers for the Personalization API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Roadmap;
use crate::personalization::pipeline::{personalize_from_response, Outcome};
use crate::personalization::prompts::{build_personalization_prompt, personalization_system_prompt};
use crate::profile::text::build_profile_text;
use crate::roadmaps::career::map_career_to_job_file;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PersonalizeRequest {
    pub user_id: Uuid,
    pub jobname: Option<String>,
}

/// POST /api/v1/roadmap/personalized
///
/// Profile lookup → career mapping → canonical load → one generation call →
/// recover / extract / reconcile. Returns the roadmap in canonical shape; when
/// the model's answer holds no JSON the canonical roadmap comes back unannotated.
pub async fn handle_personalized_roadmap(
    State(state): State<AppState>,
    Json(request): Json<PersonalizeRequest>,
) -> Result<Json<Roadmap>, AppError> {
    let profile = state
        .profiles
        .find_profile(request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown user_id {}", request.user_id)))?;

    let jobname = request
        .jobname
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(state.config.default_job_name.as_str());
    let job_file = map_career_to_job_file(jobname);
    info!("Career '{jobname}' mapped to job file '{job_file}'");

    let canonical = state.roadmaps.load(job_file).await?;

    let profile_text = build_profile_text(&profile);
    let user_prompt = build_personalization_prompt(&profile_text, &canonical)?;
    let raw_answer = state
        .generator
        .generate(&personalization_system_prompt(), &user_prompt)
        .await?;

    let personalized = personalize_from_response(&canonical, &raw_answer);
    if let Outcome::Reconciled { annotated_items } = personalized.outcome {
        info!(
            "Personalized '{job_file}' for {}: {annotated_items} items annotated by the model",
            request.user_id
        );
    }

    Ok(Json(personalized.roadmap))
}
