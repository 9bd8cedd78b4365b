//! Handlers for the `/jobs` resource: listing and the downloaded flag.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use nanodash_core::error::CoreError;
use nanodash_core::job::JobUpdate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// Snapshot of the job ledger, most recent first. Deleted jobs stay visible
/// until capacity evicts them.
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.ledger.list().await,
    }))
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
}

/// POST /api/v1/jobs/{id}/download
///
/// Mark a job's asset as downloaded and return its URL. Requires an asset;
/// rejected once the asset is deleted.
pub async fn mark_downloaded(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .ledger
        .find(&id)
        .await
        .filter(|job| job.asset.is_some())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job with output",
            id: id.clone(),
        }))?;

    if job.deleted {
        return Err(AppError::Core(CoreError::AlreadyDeleted(id)));
    }

    let url = job
        .asset
        .as_ref()
        .map(|a| a.download_url.clone())
        .unwrap_or_default();

    state
        .ledger
        .update(
            &id,
            JobUpdate {
                downloaded: Some(true),
                detail: Some("Downloaded by user".to_string()),
                downloaded_at: Some(chrono::Utc::now()),
                ..Default::default()
            },
        )
        .await;

    tracing::info!(job_id = %id, "Asset marked downloaded");

    Ok(Json(DataResponse {
        data: DownloadResponse { url },
    }))
}
