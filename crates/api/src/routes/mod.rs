//! Route definitions for the dashboard API.

pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// GET    /prompts                  random prompt sample
/// GET    /jobs                     ledger snapshot
/// POST   /generate                 queue generation jobs
/// POST   /upscale                  derive an upscaled copy (job or file)
/// GET    /gallery                  outputs directory joined with the ledger
/// POST   /jobs/{id}/download       mark downloaded, return URL
/// POST   /jobs/{id}/upload         contributor upload for a job asset
/// DELETE /jobs/{id}                delete a job's asset
/// POST   /outputs/{file}/upload    contributor upload for an orphan file
/// DELETE /outputs/{file}           delete an output file directly
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(handlers::prompts::sample_prompts))
        .route("/jobs", get(handlers::jobs::list_jobs))
        .route("/generate", post(handlers::generation::generate))
        .route("/upscale", post(handlers::assets::upscale))
        .route("/gallery", get(handlers::gallery::list_gallery))
        .route("/jobs/{id}/download", post(handlers::jobs::mark_downloaded))
        .route("/jobs/{id}/upload", post(handlers::uploads::upload_job))
        .route("/jobs/{id}", delete(handlers::assets::delete_job_asset))
        .route(
            "/outputs/{file}/upload",
            post(handlers::uploads::upload_output_file),
        )
        .route(
            "/outputs/{file}",
            delete(handlers::assets::delete_output_file),
        )
}
