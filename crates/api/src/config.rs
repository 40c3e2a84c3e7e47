use std::path::PathBuf;

use entryflow_core::worker::WorkerConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development,
/// where the Rust server lives next to the automation project tree.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3100`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Applies to
    /// producing the response head; it does not cut off streaming bodies.
    pub request_timeout_secs: u64,
    /// Locations of the automation worker runtime.
    pub worker: WorkerConfig,
    /// Directory where uploads are staged, one subdirectory per job.
    pub staging_dir: PathBuf,
    /// The downloadable spreadsheet template.
    pub template_path: PathBuf,
    /// Default launch mode: leave the browser session open after the
    /// flow finishes (hand-off) or let the worker close it.
    pub keep_browser_open: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                     |
    /// |------------------------|---------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                   |
    /// | `PORT`                 | `3100`                                      |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`                     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                        |
    /// | `AUTOMATION_ROOT`      | `.`                                         |
    /// | `WORKER_PYTHON`        | `<root>/venv/bin/python`                    |
    /// | `WORKER_SCRIPT`        | `<root>/src/main.py`                        |
    /// | `STAGING_DIR`          | `<root>/temp`                               |
    /// | `TEMPLATE_PATH`        | `<root>/data/template/iljinholdings_visit_template.xlsx` |
    /// | `KEEP_BROWSER_OPEN`    | `true`                                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3100".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let automation_root =
            PathBuf::from(std::env::var("AUTOMATION_ROOT").unwrap_or_else(|_| ".".into()));

        let python_bin = env_path("WORKER_PYTHON")
            .unwrap_or_else(|| automation_root.join("venv/bin/python"));
        let script =
            env_path("WORKER_SCRIPT").unwrap_or_else(|| automation_root.join("src/main.py"));
        let staging_dir = env_path("STAGING_DIR").unwrap_or_else(|| automation_root.join("temp"));
        let template_path = env_path("TEMPLATE_PATH").unwrap_or_else(|| {
            automation_root.join("data/template/iljinholdings_visit_template.xlsx")
        });

        let keep_browser_open: bool = std::env::var("KEEP_BROWSER_OPEN")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("KEEP_BROWSER_OPEN must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            worker: WorkerConfig {
                python_bin,
                script,
                project_root: automation_root,
            },
            staging_dir,
            template_path,
            keep_browser_open,
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var).ok().map(PathBuf::from)
}
