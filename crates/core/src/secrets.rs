//! Flat-file secret store.
//!
//! The secret file is a sequence of alternating label and value lines:
//!
//! ```text
//! Gemini
//! AIza...
//! Replicate
//! r8_...
//! ```
//!
//! Environment variables always win over the file. A missing credential for
//! a required operation is a fatal, user-visible configuration error (see
//! [`crate::error::CoreError::MissingCredential`]); it is never retried.

use std::collections::HashMap;
use std::path::Path;

/// Label of the generation API credential in the secret file.
pub const GEMINI_SECRET_LABEL: &str = "Gemini";

/// Environment variable override for the generation API credential.
pub const GEMINI_ENV_VAR: &str = "GEMINI_API_KEY";

/// Parse the label/value line format.
///
/// Blank lines are skipped; a label whose following line is missing or
/// empty is dropped.
pub fn parse_secrets(raw: &str) -> HashMap<String, String> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut secrets = HashMap::new();

    let mut i = 0;
    while i < lines.len() {
        let label = lines[i].trim();
        if label.is_empty() {
            i += 1;
            continue;
        }
        match lines.get(i + 1) {
            Some(value) if !value.trim().is_empty() => {
                secrets.insert(label.to_string(), value.trim().to_string());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    secrets
}

/// Load and parse the secret file. A missing or unreadable file is treated
/// as an empty store; the caller surfaces a missing-credential error
/// instead.
pub async fn load_secrets(path: &Path) -> HashMap<String, String> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => parse_secrets(&raw),
        Err(_) => HashMap::new(),
    }
}

/// Resolve a credential: environment variable first, then the secret file.
pub async fn resolve_secret(path: &Path, label: &str, env_var: &str) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    load_secrets(path).await.remove(label)
}
