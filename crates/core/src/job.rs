//! Job model: the unit of tracked generation/upscale/upload work.
//!
//! A [`Job`] is a plain record; all lifecycle mutation goes through the
//! ledger (see [`crate::ledger`]) as an atomic merged replace, so a record
//! is never observable in a half-updated state.

use serde::Serialize;

use crate::types::{JobId, Timestamp};

/// Upper bound on subprocesses launched per generation request.
pub const MAX_PROMPTS_PER_REQUEST: usize = 4;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What kind of work a job tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Generation,
    Upscale,
    Upload,
}

/// Job state machine states.
///
/// `scheduled -> running -> {completed, failed}`; from `completed` the
/// follow-on states are `upscaled` and `uploading -> {uploaded, upload-failed}`.
/// `failed` and `upload-failed` are terminal for that operation and never
/// retried automatically. "Downloaded" is a flag on the record, not a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Scheduled,
    Running,
    Completed,
    Failed,
    Upscaled,
    Uploading,
    Uploaded,
    UploadFailed,
}

impl JobStatus {
    /// The wire/display string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Upscaled => "upscaled",
            JobStatus::Uploading => "uploading",
            JobStatus::Uploaded => "uploaded",
            JobStatus::UploadFailed => "upload-failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Asset reference
// ---------------------------------------------------------------------------

/// A produced asset: storage-relative path plus its externally reachable URL.
///
/// The two are derived 1:1 from the file name and only ever set as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef {
    /// Path relative to the instance's storage root, e.g. `outputs/abc.png`.
    pub output: String,
    /// URL under which the asset is served, e.g. `/outputs/abc.png`.
    pub download_url: String,
}

impl AssetRef {
    /// Build the asset reference for a bare file name in the outputs
    /// directory.
    pub fn for_file(file_name: &str) -> Self {
        Self {
            output: format!("outputs/{file_name}"),
            download_url: format!("/outputs/{file_name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Job record
// ---------------------------------------------------------------------------

/// A tracked unit of work with its own state machine.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: JobType,
    /// Insertion order is significant; the first element is the canonical
    /// display label (the generation prompt, or a file label).
    pub prompts: Vec<String>,
    /// Creation or last-significant-event time.
    pub timestamp: Timestamp,
    pub status: JobStatus,
    /// Human-readable progress note, overwritten on every transition.
    pub detail: String,
    /// Present only once an asset exists on disk.
    #[serde(flatten)]
    pub asset: Option<AssetRef>,
    pub downloaded: bool,
    /// Monotonic: false -> true only.
    pub deleted: bool,
    /// Captured subprocess output, for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<Timestamp>,
}

impl Job {
    /// Create a freshly scheduled job with a new random id.
    pub fn new(
        job_type: JobType,
        prompt: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: new_job_id(),
            job_type,
            prompts: vec![prompt.into()],
            timestamp: chrono::Utc::now(),
            status: JobStatus::Scheduled,
            detail: detail.into(),
            asset: None,
            downloaded: false,
            deleted: false,
            log: None,
            downloaded_at: None,
            deleted_at: None,
            uploaded_at: None,
        }
    }

    /// Bare file name of the produced asset, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.asset
            .as_ref()
            .and_then(|a| crate::paths::file_name_of(&a.output))
    }
}

/// Generate a short opaque job id (8 hex chars).
pub fn new_job_id() -> JobId {
    format!("{:08x}", rand::random::<u32>())
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// Field-level update merged into a ledger entry in place.
///
/// Every `Some` field overwrites the corresponding job field; `None` fields
/// are left untouched. The merge is applied under the ledger's write lock,
/// so concurrent updates to the same job interleave per whole update, never
/// per field.
#[derive(Debug, Default, Clone)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub detail: Option<String>,
    pub log: Option<String>,
    pub asset: Option<AssetRef>,
    pub downloaded: Option<bool>,
    pub deleted: Option<bool>,
    pub timestamp: Option<Timestamp>,
    pub downloaded_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub uploaded_at: Option<Timestamp>,
}
