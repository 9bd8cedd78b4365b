//! Gallery listing handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use nanodash_core::gallery;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/gallery
///
/// Reconcile the outputs directory with the job ledger. Orphan files appear
/// with no job id; ledger entries without a file on disk do not appear.
pub async fn list_gallery(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = gallery::list_gallery(&state.config.outputs_dir, &state.ledger).await?;
    Ok(Json(DataResponse { data: items }))
}
