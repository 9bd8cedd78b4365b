use std::sync::Arc;

use nanodash_core::ledger::JobLedger;

use crate::automation::UploadAutomation;
use crate::config::ServerConfig;
use crate::engine::GenerationSupervisor;
use crate::prompts::PromptDeck;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; all inner data is behind `Arc`. The job ledger is the
/// single piece of shared mutable state and is owned here rather than being
/// ambient, so tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bounded in-memory job ledger.
    pub ledger: Arc<JobLedger>,
    /// Supervisor for generation subprocesses.
    pub supervisor: Arc<GenerationSupervisor>,
    /// Upload back end (browser automation in production, stub in tests).
    pub uploader: Arc<dyn UploadAutomation>,
    /// Prompt deck served by `/api/v1/prompts`.
    pub prompts: Arc<PromptDeck>,
}
