//! Gallery reconciliation: join the outputs directory with the job ledger.
//!
//! The directory is the outer loop and the sole source of which files
//! exist; the ledger only decorates files it knows about. Orphan files
//! (no matching job) and jobs whose file has gone missing are both normal:
//! the former become items with no `job_id`, the latter simply do not
//! appear.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::imagemeta;
use crate::ledger::JobLedger;
use crate::readiness::{adobe_readiness, ADOBE_MIN_PIXELS};
use crate::types::JobId;

/// File extensions the gallery considers images.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Status string shown for files with no matching job.
const ORPHAN_STATUS: &str = "generated";

/// Read-only projection of one gallery file, joined with its job if any.
///
/// Never persisted; computed on demand from the directory listing and the
/// ledger.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryItem {
    /// The matched job's id, or the bare file name for orphan files. This
    /// keeps orphans manageable through the same interface.
    pub id: String,
    pub job_id: Option<JobId>,
    /// Display label: the job's first prompt, or the file name.
    pub prompt: String,
    pub detail: String,
    pub status: String,
    pub url: String,
    pub file: String,
    pub deleted: bool,
    pub downloaded: bool,
    pub is_upscaled: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub pixels: Option<u64>,
    pub meets_adobe_min: bool,
    pub adobe_min_pixels: u64,
}

/// Whether a file name has a supported image extension (case-insensitive).
pub fn is_supported_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
        })
        .unwrap_or(false)
}

/// Name-based heuristic for derived (upscaled) assets.
pub fn is_upscaled_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().contains("upscaled")
}

/// List the outputs directory and produce one [`GalleryItem`] per image
/// file, in name order.
pub async fn list_gallery(
    outputs_dir: &Path,
    ledger: &JobLedger,
) -> io::Result<Vec<GalleryItem>> {
    let mut dir = tokio::fs::read_dir(outputs_dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_supported_image(&name) {
            files.push(name);
        }
    }
    files.sort();

    let mut items = Vec::with_capacity(files.len());
    for file in files {
        // A file can vanish between the listing and the read; degrade to
        // unknown dimensions instead of failing the whole listing.
        let dims = imagemeta::dimensions(&outputs_dir.join(&file))
            .await
            .unwrap_or(None);
        let readiness = adobe_readiness(dims);
        let job = ledger.find_by_file(&file).await;

        let item = match &job {
            Some(job) => GalleryItem {
                id: job.id.clone(),
                job_id: Some(job.id.clone()),
                prompt: job
                    .prompts
                    .first()
                    .cloned()
                    .unwrap_or_else(|| file.clone()),
                detail: job.detail.clone(),
                status: job.status.as_str().to_string(),
                url: format!("/outputs/{file}"),
                file: file.clone(),
                deleted: job.deleted,
                downloaded: job.downloaded,
                is_upscaled: is_upscaled_name(&file),
                width: dims.map(|d| d.width),
                height: dims.map(|d| d.height),
                pixels: readiness.pixels,
                meets_adobe_min: readiness.meets_adobe_min,
                adobe_min_pixels: ADOBE_MIN_PIXELS,
            },
            None => GalleryItem {
                id: file.clone(),
                job_id: None,
                prompt: file.clone(),
                detail: "Generated".to_string(),
                status: ORPHAN_STATUS.to_string(),
                url: format!("/outputs/{file}"),
                file: file.clone(),
                deleted: false,
                downloaded: false,
                is_upscaled: is_upscaled_name(&file),
                width: dims.map(|d| d.width),
                height: dims.map(|d| d.height),
                pixels: readiness.pixels,
                meets_adobe_min: readiness.meets_adobe_min,
                adobe_min_pixels: ADOBE_MIN_PIXELS,
            },
        };
        items.push(item);
    }

    Ok(items)
}
