//! Shared harness for API integration tests.
//!
//! Builds the real application router (same middleware stack as the binary)
//! on top of a temp outputs directory, with the upload back end stubbed.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use nanodash_api::automation::{AutomationError, UploadAutomation, UploadRequest};
use nanodash_api::config::ServerConfig;
use nanodash_api::engine::GenerationSupervisor;
use nanodash_api::prompts::PromptDeck;
use nanodash_api::router::build_app_router;
use nanodash_api::state::AppState;
use nanodash_core::job::{AssetRef, Job, JobStatus, JobType};
use nanodash_core::ledger::JobLedger;

/// Upload back end stub: records every request and returns a canned
/// outcome.
pub struct StubUploader {
    fail_with: Option<String>,
    pub calls: Mutex<Vec<UploadRequest>>,
}

impl StubUploader {
    pub fn ok() -> Self {
        Self {
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            fail_with: Some(stderr.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UploadAutomation for StubUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<(), AutomationError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(stderr) => Err(AutomationError::CommandFailed {
                command: "chrome-devtools.upload_file".to_string(),
                stderr: stderr.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Build a test `ServerConfig` rooted in a temp directory.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        outputs_dir: dir.join("outputs"),
        generator_bin: "/bin/sh".to_string(),
        generator_script: dir.join("generator.sh"),
        generator_resolution: "2K".to_string(),
        secrets_file: dir.join("api.txt"),
        automation_bin: "mcporter".to_string(),
        prompts_file: dir.join("prompts.json"),
    }
}

/// Build the application router plus a handle on its state, with the given
/// upload stub.
pub fn build_test_app_with(
    dir: &Path,
    uploader: Arc<dyn UploadAutomation>,
) -> (Router, AppState) {
    let config = Arc::new(test_config(dir));
    std::fs::create_dir_all(&config.outputs_dir).unwrap();

    let ledger = Arc::new(JobLedger::new());
    let supervisor = Arc::new(GenerationSupervisor::new(
        Arc::clone(&ledger),
        Arc::clone(&config),
    ));
    let state = AppState {
        config: Arc::clone(&config),
        ledger,
        supervisor,
        uploader,
        prompts: Arc::new(PromptDeck::from_prompts(vec![
            "a neon fox".to_string(),
            "a paper city".to_string(),
        ])),
    };

    (build_app_router(state.clone(), &config), state)
}

/// Build the application router with an always-succeeding upload stub.
pub fn build_test_app(dir: &Path) -> (Router, AppState) {
    build_test_app_with(dir, Arc::new(StubUploader::ok()))
}

/// Push a completed generation job and write its asset file to disk.
pub async fn seed_completed_job(state: &AppState, id: &str, file_name: &str) -> Job {
    std::fs::write(state.config.outputs_dir.join(file_name), png_bytes(2000, 3000)).unwrap();

    let mut job = Job::new(JobType::Generation, "a neon fox", format!("Saved {file_name}"));
    job.id = id.to_string();
    job.status = JobStatus::Completed;
    job.asset = Some(AssetRef::for_file(file_name));
    state.ledger.push(job.clone()).await;
    job
}

/// Minimal PNG bytes with the given IHDR dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    bytes
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response {
    request(app, Method::GET, uri, Body::empty()).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    request(app, Method::POST, uri, Body::empty()).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    request(app, Method::DELETE, uri, Body::empty()).await
}

async fn request(app: &Router, method: Method, uri: &str, body: Body) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
