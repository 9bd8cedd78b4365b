//! Bounded, most-recent-first in-memory job ledger.
//!
//! A fixed-capacity deque owned by a single long-lived instance and injected
//! into request handlers; thread-safe via interior `RwLock`, designed to be
//! wrapped in `Arc` and shared across the application. There is no durable
//! storage: a restart starts with an empty ledger.

use std::collections::VecDeque;

use tokio::sync::RwLock;

use crate::job::{Job, JobUpdate};

/// How many jobs the ledger retains before evicting the oldest.
pub const LEDGER_CAPACITY: usize = 12;

/// Bounded most-recent-first record of jobs.
pub struct JobLedger {
    entries: RwLock<VecDeque<Job>>,
    capacity: usize,
}

impl JobLedger {
    /// Create an empty ledger with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(LEDGER_CAPACITY)
    }

    /// Create an empty ledger with a custom capacity (used by tests).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Insert a job at the front. When the ledger is full the oldest entry
    /// (by insertion order, not timestamp) is discarded.
    pub async fn push(&self, job: Job) {
        let mut entries = self.entries.write().await;
        entries.push_front(job);
        while entries.len() > self.capacity {
            entries.pop_back();
        }
    }

    /// Snapshot of all entries, most recent first.
    pub async fn list(&self) -> Vec<Job> {
        self.entries.read().await.iter().cloned().collect()
    }

    /// Look up a job by id. Linear scan; the ledger is bounded and small.
    pub async fn find(&self, id: &str) -> Option<Job> {
        self.entries
            .read()
            .await
            .iter()
            .find(|job| job.id == id)
            .cloned()
    }

    /// Look up a job whose asset path ends in `/{file_name}`.
    ///
    /// This is the ledger side of the gallery join: output paths are stored
    /// as `outputs/<basename>`, so a bare file name identifies at most one
    /// entry. Nested output schemes would need a stronger contract.
    pub async fn find_by_file(&self, file_name: &str) -> Option<Job> {
        let suffix = format!("/{file_name}");
        self.entries
            .read()
            .await
            .iter()
            .find(|job| {
                job.asset
                    .as_ref()
                    .is_some_and(|a| a.output.ends_with(&suffix))
            })
            .cloned()
    }

    /// Merge `update` into the entry with the given id and return the
    /// updated record. No-op returning `None` when the id is absent
    /// (the entry may already have been evicted).
    pub async fn update(&self, id: &str, update: JobUpdate) -> Option<Job> {
        let mut entries = self.entries.write().await;
        let job = entries.iter_mut().find(|job| job.id == id)?;

        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(detail) = update.detail {
            job.detail = detail;
        }
        if let Some(log) = update.log {
            job.log = Some(log);
        }
        if let Some(asset) = update.asset {
            job.asset = Some(asset);
        }
        if let Some(downloaded) = update.downloaded {
            job.downloaded = downloaded;
        }
        if let Some(deleted) = update.deleted {
            job.deleted = deleted;
        }
        if let Some(timestamp) = update.timestamp {
            job.timestamp = timestamp;
        }
        if let Some(at) = update.downloaded_at {
            job.downloaded_at = Some(at);
        }
        if let Some(at) = update.deleted_at {
            job.deleted_at = Some(at);
        }
        if let Some(at) = update.uploaded_at {
            job.uploaded_at = Some(at);
        }

        Some(job.clone())
    }
}

impl Default for JobLedger {
    fn default() -> Self {
        Self::new()
    }
}
