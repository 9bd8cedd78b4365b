//! Generation subprocess supervisor.
//!
//! One tokio task per job: launches the external generation script, captures
//! its output, and drives the corresponding ledger entry through
//! `scheduled -> running -> {completed, failed}` on process lifecycle
//! events. There is no cancellation: a launched generation runs to
//! completion or failure. No automatic retry exists for either launch
//! failures or non-zero exits.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tokio_util::task::TaskTracker;

use nanodash_core::job::{AssetRef, JobStatus, JobUpdate};
use nanodash_core::ledger::JobLedger;
use nanodash_core::secrets::GEMINI_ENV_VAR;
use nanodash_core::types::JobId;

use crate::config::ServerConfig;

/// Supervises generation subprocesses and reflects their lifecycle into the
/// job ledger. Supervisors for distinct jobs never await each other.
pub struct GenerationSupervisor {
    ledger: Arc<JobLedger>,
    config: Arc<ServerConfig>,
    tasks: TaskTracker,
}

impl GenerationSupervisor {
    pub fn new(ledger: Arc<JobLedger>, config: Arc<ServerConfig>) -> Self {
        Self {
            ledger,
            config,
            tasks: TaskTracker::new(),
        }
    }

    /// Launch the generation process for one job and return immediately.
    ///
    /// The spawned task owns the whole lifecycle; its only channel back is
    /// the ledger update it performs on exit.
    pub fn spawn(&self, job_id: JobId, prompt: String, file_name: String, api_key: String) {
        let ledger = Arc::clone(&self.ledger);
        let config = Arc::clone(&self.config);
        self.tasks.spawn(async move {
            run_generation(ledger, config, job_id, prompt, file_name, api_key).await;
        });
    }

    /// Stop accepting new jobs and wait for in-flight generations to finish.
    pub async fn shutdown(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}

/// Drive a single generation subprocess from launch to its terminal ledger
/// state.
async fn run_generation(
    ledger: Arc<JobLedger>,
    config: Arc<ServerConfig>,
    job_id: JobId,
    prompt: String,
    file_name: String,
    api_key: String,
) {
    let output_path = config.outputs_dir.join(&file_name);

    tracing::info!(
        job_id = %job_id,
        script = %config.generator_script.display(),
        "Launching generation job",
    );

    let mut command = Command::new(&config.generator_bin);
    command
        .arg(&config.generator_script)
        .args(["--prompt", &prompt])
        .arg("--filename")
        .arg(&output_path)
        .args(["--resolution", &config.generator_resolution])
        .env(GEMINI_ENV_VAR, &api_key)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = match command.spawn() {
        Ok(child) => {
            ledger
                .update(
                    &job_id,
                    JobUpdate {
                        status: Some(JobStatus::Running),
                        detail: Some("Generating image…".to_string()),
                        ..Default::default()
                    },
                )
                .await;
            child
        }
        Err(e) => {
            // The executable could not be launched at all; fatal for the job.
            tracing::error!(job_id = %job_id, error = %e, "Generator failed to launch");
            ledger
                .update(
                    &job_id,
                    JobUpdate {
                        status: Some(JobStatus::Failed),
                        detail: Some(format!("Spawn failed: {e}")),
                        log: Some(e.to_string()),
                        timestamp: Some(chrono::Utc::now()),
                        ..Default::default()
                    },
                )
                .await;
            return;
        }
    };

    let output = match child.wait_with_output().await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Failed to collect generator output");
            ledger
                .update(
                    &job_id,
                    JobUpdate {
                        status: Some(JobStatus::Failed),
                        detail: Some(format!("Process wait failed: {e}")),
                        timestamp: Some(chrono::Utc::now()),
                        ..Default::default()
                    },
                )
                .await;
            return;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let log = if stdout.is_empty() { stderr.clone() } else { stdout };

    // Exit code 0 alone is not trusted: a crash after a partial write must
    // not be reported as success, so the output file has to exist too.
    let mut success = output.status.success();
    if success && !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
        tracing::warn!(
            job_id = %job_id,
            file = %file_name,
            "Generator exited 0 but the output file is missing",
        );
        success = false;
    }

    if success {
        tracing::info!(job_id = %job_id, file = %file_name, "Generation completed");
        ledger
            .update(
                &job_id,
                JobUpdate {
                    status: Some(JobStatus::Completed),
                    detail: Some(format!("Saved {file_name}")),
                    log: Some(log),
                    asset: Some(AssetRef::for_file(&file_name)),
                    timestamp: Some(chrono::Utc::now()),
                    ..Default::default()
                },
            )
            .await;
    } else {
        let detail = match output.status.code() {
            Some(code) => format!("Error (exit {code})"),
            None => "Error (terminated by signal)".to_string(),
        };
        tracing::error!(job_id = %job_id, detail = %detail, stderr = %stderr, "Generation failed");
        ledger
            .update(
                &job_id,
                JobUpdate {
                    status: Some(JobStatus::Failed),
                    detail: Some(detail),
                    log: Some(log),
                    timestamp: Some(chrono::Utc::now()),
                    ..Default::default()
                },
            )
            .await;
    }
}
