use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for running the dashboard
/// locally next to a checkout of the generation script.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1` -- this is a local dashboard).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Generous by default because the
    /// upload automation drives a real browser within the request.
    pub request_timeout_secs: u64,
    /// Directory where generated assets land and are served from.
    pub outputs_dir: PathBuf,
    /// Interpreter for the generation back end (default: `python3`).
    pub generator_bin: String,
    /// Path to the generation script.
    pub generator_script: PathBuf,
    /// Resolution hint passed to the generation script.
    pub generator_resolution: String,
    /// Flat label/value secret file.
    pub secrets_file: PathBuf,
    /// Browser-automation CLI used by the upload back end.
    pub automation_bin: String,
    /// JSON file with the prompt deck served by `/api/v1/prompts`.
    pub prompts_file: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `HOST`                 | `127.0.0.1`                     |
    /// | `PORT`                 | `3001`                          |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS` | `600`                           |
    /// | `OUTPUTS_DIR`          | `outputs`                       |
    /// | `GENERATOR_BIN`        | `python3`                       |
    /// | `GENERATOR_SCRIPT`     | `scripts/generate_image.py`     |
    /// | `GENERATOR_RESOLUTION` | `2K`                            |
    /// | `SECRETS_FILE`         | `$HOME/.openclaw/api.txt`       |
    /// | `AUTOMATION_BIN`       | `mcporter`                      |
    /// | `PROMPTS_FILE`         | `prompts.json`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let outputs_dir =
            PathBuf::from(std::env::var("OUTPUTS_DIR").unwrap_or_else(|_| "outputs".into()));

        let generator_bin =
            std::env::var("GENERATOR_BIN").unwrap_or_else(|_| "python3".into());

        let generator_script = PathBuf::from(
            std::env::var("GENERATOR_SCRIPT")
                .unwrap_or_else(|_| "scripts/generate_image.py".into()),
        );

        let generator_resolution =
            std::env::var("GENERATOR_RESOLUTION").unwrap_or_else(|_| "2K".into());

        let secrets_file = std::env::var("SECRETS_FILE").map(PathBuf::from).unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(".openclaw").join("api.txt")
        });

        let automation_bin =
            std::env::var("AUTOMATION_BIN").unwrap_or_else(|_| "mcporter".into());

        let prompts_file =
            PathBuf::from(std::env::var("PROMPTS_FILE").unwrap_or_else(|_| "prompts.json".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            outputs_dir,
            generator_bin,
            generator_script,
            generator_resolution,
            secrets_file,
            automation_bin,
            prompts_file,
        }
    }
}
