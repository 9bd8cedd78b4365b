//! Asset operations: upscaling and deletion.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use nanodash_core::error::CoreError;
use nanodash_core::job::{AssetRef, Job, JobStatus, JobUpdate};
use nanodash_core::paths;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Reject path traversal in user-supplied file names by reducing them to a
/// bare file name.
fn safe_file_name(name: &str) -> Option<String> {
    paths::file_name_of(name)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Upscale
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpscaleRequest {
    pub job_id: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpscaleResponse {
    pub message: String,
    pub file: String,
    pub output_url: String,
    pub job: Option<Job>,
}

/// POST /api/v1/upscale
///
/// Copy an existing asset to a freshly planned derived path. Accepts either
/// a job reference or a bare file name; orphan files (no ledger entry) are
/// upscaled without touching the ledger. A missing source asset is a
/// not-found failure, never retried.
pub async fn upscale(
    State(state): State<AppState>,
    Json(input): Json<UpscaleRequest>,
) -> AppResult<impl IntoResponse> {
    let safe_name = input.file_name.as_deref().and_then(safe_file_name);

    let mut job = match &input.job_id {
        Some(id) => state.ledger.find(id).await,
        None => None,
    };
    if job.is_none() {
        if let Some(name) = &safe_name {
            job = state.ledger.find_by_file(name).await;
        }
    }

    if let Some(job) = &job {
        if job.deleted {
            return Err(AppError::Core(CoreError::AlreadyDeleted(job.id.clone())));
        }
    }

    let relative = job
        .as_ref()
        .and_then(|j| j.asset.as_ref().map(|a| a.output.clone()))
        .or_else(|| safe_name.as_ref().map(|n| format!("outputs/{n}")))
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Job or file with output",
                id: input.job_id.clone().or(input.file_name.clone()).unwrap_or_default(),
            })
        })?;

    let source_name = paths::file_name_of(&relative).unwrap_or(&relative).to_string();
    let source = state.config.outputs_dir.join(&source_name);
    if !tokio::fs::try_exists(&source).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Source asset",
            id: source_name,
        }));
    }

    let destination = paths::upscaled_destination(&state.config.outputs_dir, &relative).await?;
    tokio::fs::copy(&source, &destination).await?;

    let derived_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let updated = match &job {
        Some(job) => {
            state
                .ledger
                .update(
                    &job.id,
                    JobUpdate {
                        status: Some(JobStatus::Upscaled),
                        detail: Some("Upscaled asset locally".to_string()),
                        asset: Some(AssetRef::for_file(&derived_name)),
                        timestamp: Some(chrono::Utc::now()),
                        ..Default::default()
                    },
                )
                .await
        }
        None => None,
    };

    tracing::info!(file = %derived_name, "Upscaled asset created");

    Ok(Json(DataResponse {
        data: UpscaleResponse {
            message: "Upscale completed.".to_string(),
            output_url: format!("/outputs/{derived_name}"),
            file: derived_name,
            job: updated,
        },
    }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub message: String,
    pub id: String,
}

/// DELETE /api/v1/jobs/{id}
///
/// Delete a job's asset. Unlinking the file is best-effort: a failure is
/// logged but the deletion is still recorded, so the ledger never gets
/// stuck on a filesystem inconsistency. Deleting an already-deleted job is
/// rejected to keep the flag meaningfully monotonic.
pub async fn delete_job_asset(
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

    if let Some(file_name) = job.file_name() {
        let absolute = state.config.outputs_dir.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&absolute).await {
            tracing::warn!(
                job_id = %id,
                path = %absolute.display(),
                error = %e,
                "Failed to unlink asset; recording deletion anyway",
            );
        }
    }

    state
        .ledger
        .update(
            &id,
            JobUpdate {
                deleted: Some(true),
                detail: Some("Deleted by user".to_string()),
                deleted_at: Some(chrono::Utc::now()),
                ..Default::default()
            },
        )
        .await;

    tracing::info!(job_id = %id, "Asset deleted");

    Ok(Json(DataResponse {
        data: DeleteJobResponse {
            message: "Asset deleted.".to_string(),
            id,
        },
    }))
}

/// DELETE /api/v1/outputs/{file}
///
/// Delete an output file directly (the gallery path, which also covers
/// orphan files). Unlike the job route this requires the unlink itself to
/// succeed; a matching ledger entry, if any, is then marked deleted.
pub async fn delete_output_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<impl IntoResponse> {
    let safe_name = safe_file_name(&file).ok_or_else(|| {
        AppError::BadRequest("File name is required.".to_string())
    })?;

    let absolute = state.config.outputs_dir.join(&safe_name);
    if !tokio::fs::try_exists(&absolute).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Output file",
            id: safe_name,
        }));
    }
    tokio::fs::remove_file(&absolute).await?;

    if let Some(job) = state.ledger.find_by_file(&safe_name).await {
        if !job.deleted {
            state
                .ledger
                .update(
                    &job.id,
                    JobUpdate {
                        deleted: Some(true),
                        detail: Some("Deleted via gallery".to_string()),
                        deleted_at: Some(chrono::Utc::now()),
                        ..Default::default()
                    },
                )
                .await;
        }
    }

    tracing::info!(file = %safe_name, "Output file deleted");

    Ok(Json(MessageResponse::new("Output deleted.")))
}
