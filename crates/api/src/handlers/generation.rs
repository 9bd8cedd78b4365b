//! Handler for submitting generation jobs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use nanodash_core::error::CoreError;
use nanodash_core::job::{Job, JobType, MAX_PROMPTS_PER_REQUEST};
use nanodash_core::naming;
use nanodash_core::secrets::{self, GEMINI_ENV_VAR, GEMINI_SECRET_LABEL};
use nanodash_core::types::JobId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: String,
    pub jobs: Vec<JobId>,
}

/// POST /api/v1/generate
///
/// Create one `scheduled` ledger entry per selected prompt (capped at
/// [`MAX_PROMPTS_PER_REQUEST`]) and launch a generation subprocess for each.
/// Returns 202 with the queued job ids; the subprocesses complete
/// asynchronously and in any order.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<impl IntoResponse> {
    if input.prompts.iter().all(|p| p.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Select at least one prompt before generation.".to_string(),
        )));
    }

    // Resolving the credential up front makes a missing key a visible
    // configuration error instead of four failed jobs.
    let api_key = secrets::resolve_secret(
        &state.config.secrets_file,
        GEMINI_SECRET_LABEL,
        GEMINI_ENV_VAR,
    )
    .await
    .ok_or_else(|| {
        AppError::Core(CoreError::MissingCredential(format!(
            "Gemini API key is missing. Set {GEMINI_ENV_VAR} or add a '{GEMINI_SECRET_LABEL}' entry to {}",
            state.config.secrets_file.display(),
        )))
    })?;

    tokio::fs::create_dir_all(&state.config.outputs_dir).await?;

    let mut queued = Vec::new();
    for prompt in input
        .prompts
        .iter()
        .filter(|p| !p.trim().is_empty())
        .take(MAX_PROMPTS_PER_REQUEST)
    {
        let job = Job::new(
            JobType::Generation,
            prompt.clone(),
            "Queued for Nano Banana generation",
        );
        let job_id = job.id.clone();
        let file_name = naming::output_filename(&job_id, prompt);

        state.ledger.push(job).await;
        tracing::info!(job_id = %job_id, file = %file_name, "Generation job queued");

        state
            .supervisor
            .spawn(job_id.clone(), prompt.clone(), file_name, api_key.clone());
        queued.push(job_id);
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: GenerateResponse {
                message: "Generation jobs submitted.".to_string(),
                jobs: queued,
            },
        }),
    ))
}
