//! Upload back end: Adobe Stock contributor upload via a browser-automation
//! CLI.
//!
//! The core only needs a boolean outcome plus diagnostic text from this
//! boundary, so the production CLI driver sits behind the
//! [`UploadAutomation`] trait and tests substitute a stub.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

/// Contributor uploads page the automation drives.
const CONTRIBUTOR_UPLOADS_URL: &str = "https://contributor.stock.adobe.com/en/uploads";

/// Per-command timeout for the automation CLI.
const CALL_TIMEOUT: Duration = Duration::from_secs(90);

/// Maximum title length accepted by the contributor form.
pub const TITLE_MAX_LEN: usize = 190;

/// Maximum number of keywords submitted with an upload.
pub const MAX_KEYWORDS: usize = 10;

/// Fallback title/keyword source when a job has no usable prompt.
const DEFAULT_LABEL: &str = "Nano Banana artwork";

static UID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"uid=(\w+)").expect("valid uid regex"));

/// Error type for the upload automation boundary.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("automation CLI failed to launch: {0}")]
    Launch(#[from] std::io::Error),

    #[error("automation command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("automation command `{command}` timed out")]
    Timeout { command: String },

    #[error("{0} not found on contributor page")]
    ElementNotFound(&'static str),
}

/// Everything the upload back end needs to push one asset.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Absolute path of the file to upload.
    pub file_path: PathBuf,
    pub title: String,
    pub keywords: String,
}

/// Boundary trait for the upload back end.
#[async_trait]
pub trait UploadAutomation: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<(), AutomationError>;
}

// ---------------------------------------------------------------------------
// Contributor metadata
// ---------------------------------------------------------------------------

/// Build the contributor title from a job's prompts: first prompt, trimmed,
/// truncated to [`TITLE_MAX_LEN`] characters.
pub fn contributor_title(prompts: &[String]) -> String {
    let base = prompts
        .first()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_LABEL);
    base.chars().take(TITLE_MAX_LEN).collect()
}

/// Build the comma-separated keyword list: the first [`MAX_KEYWORDS`] unique
/// lowercased alphanumeric words of the first prompt, in prompt order.
pub fn contributor_keywords(prompts: &[String]) -> String {
    let prompt = prompts
        .first()
        .map(String::as_str)
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_LABEL);

    let lowered = prompt.to_lowercase();
    let mut keywords: Vec<&str> = Vec::new();
    for word in lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !keywords.contains(&word) {
            keywords.push(word);
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    keywords.join(", ")
}

/// Display label for an orphan output file: `-`/`_` runs become spaces.
pub fn file_label(file_name: &str) -> String {
    let mut label = String::with_capacity(file_name.len());
    let mut pending_space = false;
    for c in file_name.chars() {
        if c == '-' || c == '_' {
            pending_space = true;
        } else {
            if pending_space && !label.is_empty() {
                label.push(' ');
            }
            pending_space = false;
            label.push(c);
        }
    }
    label
}

// ---------------------------------------------------------------------------
// Snapshot parsing
// ---------------------------------------------------------------------------

/// Find the `uid=` of the first snapshot line containing `label`.
///
/// Accessibility snapshots list one element per line, e.g.
/// `uid=btn_42 button "Browse"`.
fn find_uid(snapshot: &str, label: &str) -> Option<String> {
    snapshot.lines().find_map(|line| {
        if !line.contains(label) {
            return None;
        }
        UID_RE
            .captures(line)
            .map(|caps| caps[1].to_string())
    })
}

/// One-line page script that fills the title and keyword fields of the
/// contributor form. Values are JSON-escaped into the script body.
fn metadata_fill_script(title: &str, keywords: &str) -> String {
    let title_js = serde_json::to_string(title).unwrap_or_else(|_| "\"\"".into());
    let keywords_js = serde_json::to_string(keywords).unwrap_or_else(|_| "\"\"".into());
    format!(
        "() => {{ const titleText = {title_js}; const keywordsText = {keywords_js}; \
         const titleField = document.querySelector('textarea[name=\"title\"]') || \
         document.querySelector('textarea[aria-label=\"Content title\"]'); \
         if (titleField) {{ titleField.value = titleText; \
         titleField.dispatchEvent(new Event('input', {{ bubbles: true }})); }} \
         const keywordsField = document.querySelector('textarea[name=\"keywordsUITextArea\"]') || \
         document.querySelector('textarea[aria-label=\"Paste Keywords...\"]'); \
         if (keywordsField) {{ keywordsField.value = keywordsText; \
         keywordsField.dispatchEvent(new Event('input', {{ bubbles: true }})); }} \
         return {{ title: Boolean(titleField), keywords: Boolean(keywordsField) }}; }}"
    )
}

// ---------------------------------------------------------------------------
// CLI driver
// ---------------------------------------------------------------------------

/// Production upload back end: drives a headed browser through the
/// `chrome-devtools` tool set of the configured automation CLI.
pub struct BrowserAutomation {
    bin: String,
}

impl BrowserAutomation {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run one `chrome-devtools.*` command and return its stdout.
    async fn call(&self, command: &str, args: &[String]) -> Result<String, AutomationError> {
        let tool = format!("chrome-devtools.{command}");
        tracing::debug!(tool = %tool, "Automation call");

        let output = tokio::time::timeout(
            CALL_TIMEOUT,
            Command::new(&self.bin)
                .arg("call")
                .arg(&tool)
                .args(args)
                .output(),
        )
        .await
        .map_err(|_| AutomationError::Timeout {
            command: tool.clone(),
        })??;

        if !output.status.success() {
            return Err(AutomationError::CommandFailed {
                command: tool,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn click(&self, uid: &str) -> Result<(), AutomationError> {
        self.call("click", &[format!("uid={uid}")]).await?;
        Ok(())
    }
}

#[async_trait]
impl UploadAutomation for BrowserAutomation {
    async fn upload(&self, request: &UploadRequest) -> Result<(), AutomationError> {
        self.call(
            "navigate_page",
            &[format!("url={CONTRIBUTOR_UPLOADS_URL}")],
        )
        .await?;

        // The Browse button is only present once the upload dialog is open;
        // on a fresh page it hides behind an Upload button.
        let mut snapshot = self.call("take_snapshot", &[]).await?;
        let mut browse = find_uid(&snapshot, "button \"Browse\"");
        if browse.is_none() {
            let upload = find_uid(&snapshot, "button \"Upload\"")
                .ok_or(AutomationError::ElementNotFound("Upload button"))?;
            self.click(&upload).await?;
            snapshot = self.call("take_snapshot", &[]).await?;
            browse = find_uid(&snapshot, "button \"Browse\"");
        }
        let browse = browse.ok_or(AutomationError::ElementNotFound("Browse button"))?;

        self.call(
            "upload_file",
            &[
                format!("uid={browse}"),
                format!("filePath={}", request.file_path.display()),
            ],
        )
        .await?;

        self.call("take_snapshot", &[]).await?;
        let script = metadata_fill_script(&request.title, &request.keywords);
        self.call("evaluate_script", &[format!("function={script}")])
            .await?;

        // A release dialog may pop up; dismiss it before saving.
        let snapshot = self.call("take_snapshot", &[]).await?;
        if let Some(no) = find_uid(&snapshot, "button \"No\"") {
            self.click(&no).await?;
        }
        let save = find_uid(&snapshot, "button \"Save work\"")
            .ok_or(AutomationError::ElementNotFound("Save work button"))?;
        self.click(&save).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompts(p: &str) -> Vec<String> {
        vec![p.to_string()]
    }

    #[test]
    fn title_is_first_prompt_trimmed() {
        assert_eq!(
            contributor_title(&prompts("  Neon fox at dusk  ")),
            "Neon fox at dusk"
        );
    }

    #[test]
    fn title_truncates_to_limit() {
        let long = "x".repeat(400);
        assert_eq!(contributor_title(&prompts(&long)).len(), TITLE_MAX_LEN);
    }

    #[test]
    fn title_falls_back_without_prompts() {
        assert_eq!(contributor_title(&[]), "Nano Banana artwork");
        assert_eq!(contributor_title(&prompts("   ")), "Nano Banana artwork");
    }

    #[test]
    fn keywords_are_unique_lowercased_and_capped() {
        let kw = contributor_keywords(&prompts("Neon fox, neon CITY, fox lights"));
        assert_eq!(kw, "neon, fox, city, lights");

        let many = contributor_keywords(&prompts(
            "one two three four five six seven eight nine ten eleven",
        ));
        assert_eq!(many.split(", ").count(), MAX_KEYWORDS);
        assert!(!many.contains("eleven"));
    }

    #[test]
    fn file_label_flattens_separator_runs() {
        assert_eq!(file_label("abc-12__neon-fox.png"), "abc 12 neon fox.png");
    }

    #[test]
    fn find_uid_requires_matching_label() {
        let snapshot = "\
uid=node_1 link \"Home\"\n\
uid=node_7 button \"Upload\"\n\
uid=node_9 button \"Browse\"\n";
        assert_eq!(
            find_uid(snapshot, "button \"Browse\"").as_deref(),
            Some("node_9")
        );
        assert_eq!(
            find_uid(snapshot, "button \"Upload\"").as_deref(),
            Some("node_7")
        );
        assert_eq!(find_uid(snapshot, "button \"Save work\""), None);
    }

    #[test]
    fn metadata_script_escapes_quotes() {
        let script = metadata_fill_script("a \"quoted\" title", "k1, k2");
        assert!(script.contains(r#"const titleText = "a \"quoted\" title";"#));
        assert!(script.contains(r#"const keywordsText = "k1, k2";"#));
    }
}
