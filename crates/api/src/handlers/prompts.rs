//! Prompt sampling handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::prompts::SAMPLE_SIZE;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    pub prompts: Vec<String>,
}

/// GET /api/v1/prompts
///
/// A fresh random sample from the prompt deck on every call.
pub async fn sample_prompts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: PromptsResponse {
            prompts: state.prompts.sample(SAMPLE_SIZE),
        },
    }))
}
