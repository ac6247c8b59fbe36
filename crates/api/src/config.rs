use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for background work after the listener closes.
    pub shutdown_timeout_secs: u64,
    /// Project tree file (default: `data/projects.json`).
    pub projects_file: PathBuf,
    /// Base URL of the generation service. Generation is disabled when unset.
    pub generation_api_url: Option<String>,
    /// Service id used when a request names none.
    pub generation_service_id: String,
    /// Pause between scene dispatches during batch storyboard runs.
    pub batch_step_delay_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `PROJECTS_FILE`         | `data/projects.json`    |
    /// | `GENERATION_API_URL`    | unset                   |
    /// | `GENERATION_SERVICE_ID` | `default`               |
    /// | `BATCH_STEP_DELAY_MS`   | `300`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let projects_file = std::env::var("PROJECTS_FILE")
            .unwrap_or_else(|_| "data/projects.json".into())
            .into();

        let generation_api_url = std::env::var("GENERATION_API_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let generation_service_id =
            std::env::var("GENERATION_SERVICE_ID").unwrap_or_else(|_| "default".into());

        let batch_step_delay_ms: u64 = std::env::var("BATCH_STEP_DELAY_MS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("BATCH_STEP_DELAY_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            projects_file,
            generation_api_url,
            generation_service_id,
            batch_step_delay_ms,
        }
    }
}
