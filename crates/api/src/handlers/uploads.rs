//! Upload handlers: push an asset to the Adobe Stock contributor portal via
//! the automation back end.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use nanodash_core::error::CoreError;
use nanodash_core::job::{JobStatus, JobUpdate};
use nanodash_core::paths;

use crate::automation::{
    contributor_keywords, contributor_title, file_label, UploadRequest,
};
use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /api/v1/jobs/{id}/upload
///
/// Drive the upload automation for a job's asset. The job moves to
/// `uploading` first, then to `uploaded` or `upload-failed`; a failure
/// keeps the captured diagnostic in `detail` and is never retried
/// automatically. Refused outright (no state change) when the job has no
/// asset or is already deleted.
pub async fn upload_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .ledger
        .find(&id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: id.clone(),
        }))?;

    if job.deleted {
        return Err(AppError::Core(CoreError::AlreadyDeleted(id)));
    }
    let Some(file_name) = job.file_name().map(str::to_string) else {
        return Err(AppError::Core(CoreError::Validation(
            "Job has no available asset to upload.".to_string(),
        )));
    };

    state
        .ledger
        .update(
            &id,
            JobUpdate {
                status: Some(JobStatus::Uploading),
                detail: Some("Automating Adobe Stock upload".to_string()),
                ..Default::default()
            },
        )
        .await;

    let request = UploadRequest {
        file_path: state.config.outputs_dir.join(&file_name),
        title: contributor_title(&job.prompts),
        keywords: contributor_keywords(&job.prompts),
    };

    match state.uploader.upload(&request).await {
        Ok(()) => {
            state
                .ledger
                .update(
                    &id,
                    JobUpdate {
                        status: Some(JobStatus::Uploaded),
                        detail: Some("Upload completed on Adobe Stock".to_string()),
                        uploaded_at: Some(chrono::Utc::now()),
                        ..Default::default()
                    },
                )
                .await;
            tracing::info!(job_id = %id, "Upload automation completed");
            Ok(Json(MessageResponse::new("Upload automation completed.")))
        }
        Err(e) => {
            tracing::error!(job_id = %id, error = %e, "Upload automation failed");
            state
                .ledger
                .update(
                    &id,
                    JobUpdate {
                        status: Some(JobStatus::UploadFailed),
                        detail: Some(e.to_string()),
                        ..Default::default()
                    },
                )
                .await;
            Err(AppError::Automation(e))
        }
    }
}

/// POST /api/v1/outputs/{file}/upload
///
/// Upload an output file that has no ledger entry (e.g. left over from a
/// previous run). The file name doubles as the metadata source; the ledger
/// is not touched.
pub async fn upload_output_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<impl IntoResponse> {
    let safe_name = paths::file_name_of(&file)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("File name is required.".to_string()))?;

    let absolute = state.config.outputs_dir.join(&safe_name);
    if !tokio::fs::try_exists(&absolute).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Output file",
            id: safe_name,
        }));
    }

    let label = vec![file_label(&safe_name)];
    let request = UploadRequest {
        file_path: absolute,
        title: contributor_title(&label),
        keywords: contributor_keywords(&label),
    };

    state.uploader.upload(&request).await.map_err(|e| {
        tracing::error!(file = %safe_name, error = %e, "Output upload automation failed");
        AppError::Automation(e)
    })?;

    tracing::info!(file = %safe_name, "Output upload automation completed");
    Ok(Json(MessageResponse::new(
        "Upload automation completed for output file.",
    )))
}
